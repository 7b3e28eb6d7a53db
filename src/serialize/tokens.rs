// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! `node://<id>` and `asset://<id>` link tokens as written by link editors and rich text.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

static NODE_TOKEN: OnceLock<Regex> = OnceLock::new();
static ASSET_TOKEN: OnceLock<Regex> = OnceLock::new();
static EMBEDDED_TOKEN: OnceLock<Regex> = OnceLock::new();

fn node_token() -> &'static Regex {
    NODE_TOKEN.get_or_init(|| Regex::new(r"^node://[a-z0-9-]+$").expect("static regex"))
}

fn asset_token() -> &'static Regex {
    ASSET_TOKEN.get_or_init(|| Regex::new(r"^asset://[a-z0-9-]+$").expect("static regex"))
}

fn embedded_token() -> &'static Regex {
    EMBEDDED_TOKEN
        .get_or_init(|| Regex::new(r"(node|asset)://([a-z0-9-]+)").expect("static regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScheme {
    Node,
    Asset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkToken<'t> {
    pub scheme: LinkScheme,
    /// The whole token, e.g. `node://about`.
    pub token: &'t str,
    pub identifier: &'t str,
}

/// The token `text` consists of, if it is exactly one token.
pub fn exact_token(text: &str) -> Option<LinkToken<'_>> {
    let scheme = if node_token().is_match(text) {
        LinkScheme::Node
    } else if asset_token().is_match(text) {
        LinkScheme::Asset
    } else {
        return None;
    };
    let (_, identifier) = text.split_once("://")?;
    Some(LinkToken { scheme, token: text, identifier })
}

/// Replaces every embedded token with `resolve(token)`; `None` empties the matched span.
pub fn replace_embedded<'t>(
    text: &'t str,
    mut resolve: impl FnMut(LinkToken<'_>) -> Option<String>,
) -> Cow<'t, str> {
    embedded_token().replace_all(text, |captures: &Captures<'_>| {
        let scheme = match &captures[1] {
            "node" => LinkScheme::Node,
            _ => LinkScheme::Asset,
        };
        let token = captures.get(0).map_or("", |m| m.as_str());
        let identifier = captures.get(2).map_or("", |m| m.as_str());
        resolve(LinkToken { scheme, token, identifier }).unwrap_or_default()
    })
}
