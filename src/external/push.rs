use crate::config::PushConfig;
use crate::error::{AppError, AppResult};
use serde_json::{Value, json};

/// 推送网关客户端。传输本身不归本服务管，这里只负责投递请求。
#[derive(Clone)]
pub struct PushGateway {
    config: PushConfig,
    client: reqwest::Client,
}

impl PushGateway {
    pub fn new(config: PushConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub async fn send(&self, device_token: &str, title: &str, body: &str) -> AppResult<()> {
        if self.config.base_url.is_empty() {
            // 未配置网关时静默跳过，本地开发常态
            log::debug!("Push gateway not configured, skipping delivery");
            return Ok(());
        }

        let url = format!("{}/v1/push", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&build_payload(device_token, title, body))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Push gateway returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

fn build_payload(device_token: &str, title: &str, body: &str) -> Value {
    json!({
        "to": device_token,
        "notification": {
            "title": title,
            "body": body,
        }
    })
}
