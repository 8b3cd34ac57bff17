// src/models/quote.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Decode, Encode, FromRow, Postgres, Type,
};
use utoipa::ToSchema;
use uuid::Uuid;

/// Valor antigo gravado antes da padronização do enum.
pub const LEGACY_REQUESTED_STATUS: &str = "SOLICITACAO";

// A coluna `quotes.status` é TEXT (há dados antigos), então o mapeamento
// para o enum é feito à mão em vez de `#[derive(sqlx::Type)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    Solicitado,
    EmAnalise,
    Enviado,
    Aprovado,
    Rejeitado,
    Agendado,
    Cancelado,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Solicitado => "SOLICITADO",
            QuoteStatus::EmAnalise => "EM_ANALISE",
            QuoteStatus::Enviado => "ENVIADO",
            QuoteStatus::Aprovado => "APROVADO",
            QuoteStatus::Rejeitado => "REJEITADO",
            QuoteStatus::Agendado => "AGENDADO",
            QuoteStatus::Cancelado => "CANCELADO",
        }
    }

    /// Lê o status do banco. O literal antigo é aceito como SOLICITADO.
    pub fn parse(raw: &str) -> Result<Self, UnknownQuoteStatus> {
        match raw {
            "SOLICITADO" | LEGACY_REQUESTED_STATUS => Ok(QuoteStatus::Solicitado),
            "EM_ANALISE" => Ok(QuoteStatus::EmAnalise),
            "ENVIADO" => Ok(QuoteStatus::Enviado),
            "APROVADO" => Ok(QuoteStatus::Aprovado),
            "REJEITADO" => Ok(QuoteStatus::Rejeitado),
            "AGENDADO" => Ok(QuoteStatus::Agendado),
            "CANCELADO" => Ok(QuoteStatus::Cancelado),
            other => Err(UnknownQuoteStatus(other.to_string())),
        }
    }

    /// Estados finais não aceitam mais mudança manual de status.
    pub fn is_final(&self) -> bool {
        matches!(self, QuoteStatus::Agendado | QuoteStatus::Cancelado | QuoteStatus::Rejeitado)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("status de orçamento desconhecido: {0}")]
pub struct UnknownQuoteStatus(pub String);

impl Type<Postgres> for QuoteStatus {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for QuoteStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<Postgres>>::decode(value)?;
        Ok(QuoteStatus::parse(raw)?)
    }
}

impl Encode<'_, Postgres> for QuoteStatus {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub pet_id: Uuid,
    pub service_id: Uuid,
    pub status: QuoteStatus,
    #[schema(example = true)]
    pub is_recurring: bool,
    #[schema(example = "359.60")]
    pub total: Decimal,
    pub desired_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Resultado da padronização de status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationReport {
    /// Linhas reescritas nesta execução
    pub updated: u64,
    /// Linhas que ainda guardam o literal antigo (sempre 0 após o commit)
    pub remaining: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_literal_reads_as_requested() {
        assert_eq!(QuoteStatus::parse("SOLICITACAO").unwrap(), QuoteStatus::Solicitado);
        assert_eq!(QuoteStatus::parse("SOLICITADO").unwrap(), QuoteStatus::Solicitado);
    }

    #[test]
    fn never_writes_the_legacy_literal() {
        let all = [
            QuoteStatus::Solicitado,
            QuoteStatus::EmAnalise,
            QuoteStatus::Enviado,
            QuoteStatus::Aprovado,
            QuoteStatus::Rejeitado,
            QuoteStatus::Agendado,
            QuoteStatus::Cancelado,
        ];
        for status in all {
            assert_ne!(status.as_str(), LEGACY_REQUESTED_STATUS);
            assert_eq!(QuoteStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(QuoteStatus::parse("PENDENTE").is_err());
        assert!(QuoteStatus::parse("").is_err());
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&QuoteStatus::EmAnalise).unwrap();
        assert_eq!(json, "\"EM_ANALISE\"");
    }
}
