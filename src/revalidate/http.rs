// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{Notifier, NotifyError, RevalidatePayload};

/// Posts batches as JSON with a bearer token.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: Client,
    timeout: Duration,
}

impl HttpNotifier {
    pub fn new(timeout: Duration) -> Self {
        Self { client: Client::new(), timeout }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn post_batch(
        &self,
        endpoint: &str,
        token: &str,
        payload: &RevalidatePayload,
    ) -> Result<(), NotifyError> {
        let request = self.client.post(endpoint).bearer_auth(token).json(payload).send();
        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| NotifyError::Timeout { seconds: self.timeout.as_secs() })??;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotifyError::Status { status: status.as_u16(), body })
    }
}
