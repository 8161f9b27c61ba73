//! Twilio Messages API as the SMS sink.

use tracing::debug;

use super::{DeliveryReceipt, ProviderFuture, SmsSink, send_checked};
use crate::config::SmsCredentials;

pub const TWILIO_API_URL: &str = "https://api.twilio.com";

/// Sends SMS through a Twilio account.
#[derive(Debug, Clone)]
pub struct TwilioSink {
    client: reqwest::Client,
    credentials: SmsCredentials,
    base_url: String,
}

impl TwilioSink {
    pub fn new(client: reqwest::Client, credentials: SmsCredentials) -> Self {
        Self {
            client,
            credentials,
            base_url: TWILIO_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Messages resource for the configured account.
    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            self.credentials.account_sid
        )
    }
}

impl SmsSink for TwilioSink {
    fn send(&self, to: &str, body: &str) -> ProviderFuture<'_, DeliveryReceipt> {
        let to = to.to_string();
        let body = body.to_string();
        Box::pin(async move {
            let request = self
                .client
                .post(self.messages_url())
                .basic_auth(
                    &self.credentials.account_sid,
                    Some(&self.credentials.auth_token),
                )
                .form(&[
                    ("To", to.as_str()),
                    ("From", self.credentials.from_number.as_str()),
                    ("Body", body.as_str()),
                ]);
            let text = send_checked("twilio", request).await?;
            let receipt: DeliveryReceipt = serde_json::from_str(&text)?;
            debug!(to = %to, sid = %receipt.sid, status = %receipt.status, "SMS accepted");
            Ok(receipt)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink(base: &str) -> TwilioSink {
        TwilioSink::new(
            reqwest::Client::new(),
            SmsCredentials {
                account_sid: "AC123".into(),
                auth_token: "token".into(),
                from_number: "+15550001111".into(),
            },
        )
        .with_base_url(base)
    }

    #[test]
    fn messages_url_targets_account() {
        assert_eq!(
            sink(TWILIO_API_URL).messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
        assert_eq!(
            sink("http://127.0.0.1:9000/").messages_url(),
            "http://127.0.0.1:9000/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}
