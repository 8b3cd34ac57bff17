// src/services/push.rs

use std::net::{Ipv4Addr, Ipv6Addr};

use async_trait::async_trait;
use url::{Host, Url};
use uuid::Uuid;
use web_push::{
    ContentEncoding, HyperWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushError, WebPushMessageBuilder,
};

use crate::{
    common::error::AppError,
    models::notification::{NotificationSubscription, PushPayload},
};

// Tempo (segundos) que o serviço de push guarda a mensagem se o dispositivo estiver offline
const PUSH_TTL_SECONDS: u32 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Delivered,
    /// O provedor respondeu 404/410: a assinatura não existe mais
    Gone,
}

#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(
        &self,
        subscription: &NotificationSubscription,
        payload: &PushPayload,
    ) -> Result<PushOutcome, AppError>;
}

// =============================================================================
//  ENDPOINTS
// =============================================================================

fn is_internal_v4(ip: &Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified()
}

fn is_internal_v6(ip: &Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_internal_v4(&v4);
    }
    let first = ip.segments()[0];
    // fc00::/7 (ULA) e fe80::/10 (link-local)
    ip.is_loopback() || ip.is_unspecified() || (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80
}

/// Endpoint de push precisa ser `https` e apontar para fora da rede interna
pub fn validate_push_endpoint(endpoint: &str) -> Result<(), AppError> {
    let invalid = || AppError::BadRequest("Endpoint de push inválido.".into());

    let url = Url::parse(endpoint).map_err(|_| invalid())?;
    if url.scheme() != "https" {
        return Err(AppError::BadRequest("Endpoint de push deve usar https.".into()));
    }

    let internal = match url.host().ok_or_else(invalid)? {
        Host::Domain(domain) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        Host::Ipv4(ip) => is_internal_v4(&ip),
        Host::Ipv6(ip) => is_internal_v6(&ip),
    };

    if internal {
        return Err(AppError::BadRequest("Endpoint de push aponta para rede interna.".into()));
    }

    Ok(())
}

// =============================================================================
//  WEB PUSH (VAPID + aes128gcm)
// =============================================================================

pub struct WebPushSender {
    client: HyperWebPushClient,
    vapid_private_key: Option<String>,
    vapid_subject: Option<String>,
}

impl WebPushSender {
    /// Chave privada VAPID em base64 url-safe; o `subject` vira a claim `sub`
    pub fn new(vapid_private_key: Option<String>, vapid_subject: Option<String>) -> Self {
        Self {
            client: HyperWebPushClient::new(),
            vapid_private_key,
            vapid_subject,
        }
    }

    fn push_error(e: WebPushError) -> AppError {
        AppError::Upstream { status: 502, message: format!("Falha no Web Push: {}", e) }
    }
}

#[async_trait]
impl PushSender for WebPushSender {
    async fn send(
        &self,
        subscription: &NotificationSubscription,
        payload: &PushPayload,
    ) -> Result<PushOutcome, AppError> {
        let private_key = self
            .vapid_private_key
            .as_deref()
            .ok_or_else(|| AppError::ServiceUnavailable("Web Push não configurado.".into()))?;

        // Assinaturas gravadas antes da validação de endpoint não saem daqui
        validate_push_endpoint(&subscription.endpoint)?;

        let info = SubscriptionInfo::new(
            subscription.endpoint.as_str(),
            subscription.p256dh.as_str(),
            subscription.auth.as_str(),
        );

        let mut signature = VapidSignatureBuilder::from_base64(private_key, &info).map_err(Self::push_error)?;
        if let Some(subject) = &self.vapid_subject {
            signature.add_claim("sub", subject.as_str());
        }
        let signature = signature.build().map_err(Self::push_error)?;

        let content = serde_json::to_vec(payload)
            .map_err(|e| AppError::InternalServerError(e.into()))?;

        let mut builder = WebPushMessageBuilder::new(&info);
        builder.set_payload(ContentEncoding::Aes128Gcm, &content);
        builder.set_vapid_signature(signature);
        builder.set_ttl(PUSH_TTL_SECONDS);
        let message = builder.build().map_err(Self::push_error)?;

        match self.client.send(message).await {
            Ok(()) => Ok(PushOutcome::Delivered),
            Err(WebPushError::EndpointNotFound { .. }) | Err(WebPushError::EndpointNotValid { .. }) => {
                Ok(PushOutcome::Gone)
            }
            Err(e) => Err(Self::push_error(e)),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeliverySummary {
    pub delivered: u32,
    pub failed: u32,
    pub expired: Vec<Uuid>,
}

/// Envia para cada assinatura de forma isolada: a falha de uma não interrompe as outras
pub async fn deliver_to_subscriptions(
    sender: &dyn PushSender,
    subscriptions: &[NotificationSubscription],
    payload: &PushPayload,
) -> DeliverySummary {
    let mut summary = DeliverySummary::default();

    for subscription in subscriptions {
        match sender.send(subscription, payload).await {
            Ok(PushOutcome::Delivered) => summary.delivered += 1,
            Ok(PushOutcome::Gone) => summary.expired.push(subscription.id),
            Err(e) => {
                tracing::warn!(
                    "Falha ao enviar push para a assinatura {}: {}",
                    subscription.id,
                    e
                );
                summary.failed += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::NotificationType;
    use chrono::Utc;

    struct ScriptedSender;

    #[async_trait]
    impl PushSender for ScriptedSender {
        async fn send(
            &self,
            subscription: &NotificationSubscription,
            _payload: &PushPayload,
        ) -> Result<PushOutcome, AppError> {
            match subscription.endpoint.as_str() {
                "https://push.test/ok" => Ok(PushOutcome::Delivered),
                "https://push.test/gone" => Ok(PushOutcome::Gone),
                _ => Err(AppError::Upstream { status: 500, message: "falhou".into() }),
            }
        }
    }

    fn subscription(endpoint: &str) -> NotificationSubscription {
        NotificationSubscription {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            endpoint: endpoint.to_string(),
            p256dh: "p256dh".into(),
            auth: "auth".into(),
            user_agent: None,
            created_at: Utc::now(),
        }
    }

    fn payload() -> PushPayload {
        PushPayload {
            notification_id: Uuid::new_v4(),
            kind: NotificationType::System,
            title: "Teste".into(),
            body: "Mensagem".into(),
        }
    }

    #[tokio::test]
    async fn one_failing_subscription_does_not_stop_the_others() {
        let subs = vec![
            subscription("https://push.test/erro"),
            subscription("https://push.test/ok"),
            subscription("https://push.test/gone"),
            subscription("https://push.test/ok"),
        ];

        let summary = deliver_to_subscriptions(&ScriptedSender, &subs, &payload()).await;

        assert_eq!(summary.delivered, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.expired, vec![subs[2].id]);
    }

    #[test]
    fn only_public_https_endpoints_are_accepted() {
        assert!(validate_push_endpoint("https://fcm.googleapis.com/fcm/send/abc").is_ok());
        assert!(validate_push_endpoint("https://updates.push.services.mozilla.com/wpush/v2/x").is_ok());

        for endpoint in [
            "http://fcm.googleapis.com/fcm/send/abc",
            "http://127.0.0.1:8080/hook",
            "https://127.0.0.1/hook",
            "https://localhost/hook",
            "https://10.0.0.5/hook",
            "https://192.168.1.10/hook",
            "https://169.254.169.254/latest/meta-data",
            "https://[::1]/hook",
            "https://[::ffff:127.0.0.1]/hook",
            "ftp://push.test/x",
            "não é url",
        ] {
            assert!(
                matches!(validate_push_endpoint(endpoint), Err(AppError::BadRequest(_))),
                "{endpoint} deveria ser rejeitado"
            );
        }
    }

    #[tokio::test]
    async fn sender_without_vapid_key_refuses_to_send() {
        let sender = WebPushSender::new(None, Some("mailto:contato@7pet.test".into()));

        let result = sender.send(&subscription("https://push.test/ok"), &payload()).await;

        assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn internal_endpoint_is_never_contacted() {
        let sender = WebPushSender::new(Some("chave".into()), None);

        let result = sender.send(&subscription("http://127.0.0.1:9/hook"), &payload()).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn no_subscriptions_means_nothing_sent() {
        let summary = deliver_to_subscriptions(&ScriptedSender, &[], &payload()).await;
        assert_eq!(summary, DeliverySummary::default());
    }
}
