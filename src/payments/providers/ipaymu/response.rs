//! Reply interpretation
//!
//! The gateway answers with a flat JSON object whose values are loosely
//! typed (numbers arrive as strings or numbers). [`interpret`] decides
//! whether a reply is an application failure; the per-endpoint reply
//! records then extract and type-check the fields they need.

use super::request::Endpoint;
use crate::error::{IpaymuError, IpaymuResult};
use crate::payments::types::RawFields;
use crate::transport::TransportResponse;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::Value;

pub const STATUS_FIELD: &str = "Status";
pub const DESCRIPTION_FIELD: &str = "Keterangan";

/// Gateway local time (Asia/Jakarta).
const GATEWAY_UTC_OFFSET_SECS: i32 = 7 * 3600;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Loose emptiness of the status marker: absent, null, false, "", "0" and 0.
fn is_empty_marker(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(flag)) => !flag,
        Some(Value::String(s)) => s.is_empty() || s == "0",
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(_) => false,
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Classify a reply. Returns the unmodified fields on success.
pub fn interpret(endpoint: Endpoint, reply: &TransportResponse) -> IpaymuResult<RawFields> {
    let parsed: Value = match serde_json::from_str(&reply.body) {
        Ok(value) => value,
        Err(e) if reply.is_success() => {
            return Err(IpaymuError::malformed_response(format!(
                "{} reply is not JSON: {}",
                endpoint.name(),
                e
            )))
        }
        Err(_) => return Err(IpaymuError::transport(format!("HTTP {}", reply.status))),
    };

    let fields = match parsed {
        Value::Object(fields) => fields,
        other => {
            return Err(IpaymuError::malformed_response(format!(
                "{} reply is not an object: {}",
                endpoint.name(),
                other
            )))
        }
    };

    let marker = fields.get(STATUS_FIELD);
    if !is_empty_marker(marker) {
        let is_record = endpoint
            .record_field()
            .is_some_and(|field| fields.contains_key(field));

        if !is_record {
            let code = marker.map(scalar_to_string).unwrap_or_default();
            let message = fields
                .get(DESCRIPTION_FIELD)
                .map(scalar_to_string)
                .unwrap_or_default();
            return Err(IpaymuError::gateway(code, message));
        }
    } else if !reply.is_success() {
        return Err(IpaymuError::transport(format!("HTTP {}", reply.status)));
    }

    Ok(fields)
}

fn field<'a>(fields: &'a RawFields, name: &str, endpoint: Endpoint) -> IpaymuResult<&'a Value> {
    match fields.get(name) {
        None | Some(Value::Null) => Err(IpaymuError::missing_field(name, endpoint.name())),
        Some(value) => Ok(value),
    }
}

fn string_field(fields: &RawFields, name: &str, endpoint: Endpoint) -> IpaymuResult<String> {
    match field(fields, name, endpoint)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(IpaymuError::invalid_field(name, other.to_string())),
    }
}

fn number_field(fields: &RawFields, name: &str, endpoint: Endpoint) -> IpaymuResult<f64> {
    let value = field(fields, name, endpoint)?;
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .filter(|n| n.is_finite())
        .ok_or_else(|| IpaymuError::invalid_field(name, value.to_string()))
}

/// Integer value of a field. Fractions are truncated toward zero.
fn integer_field(fields: &RawFields, name: &str, endpoint: Endpoint) -> IpaymuResult<i64> {
    let value = field(fields, name, endpoint)?;
    let integer = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    };
    integer.ok_or_else(|| IpaymuError::invalid_field(name, value.to_string()))
}

/// Exact integer status code. Fractions are rejected, not truncated.
fn code_field(fields: &RawFields, name: &str, endpoint: Endpoint) -> IpaymuResult<i64> {
    let value = field(fields, name, endpoint)?;
    let code = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    code.ok_or_else(|| IpaymuError::invalid_field(name, value.to_string()))
}

/// Parse a gateway timestamp into a fixed-offset date-time.
///
/// Naive values (`2024-01-01 10:00:00`) are gateway local time; RFC 3339
/// values keep their own offset.
pub fn parse_gateway_timestamp(raw: &str) -> IpaymuResult<DateTime<FixedOffset>> {
    let raw = raw.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp);
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| IpaymuError::invalid_timestamp(raw))?;

    FixedOffset::east_opt(GATEWAY_UTC_OFFSET_SECS)
        .and_then(|offset| offset.from_local_datetime(&naive).single())
        .ok_or_else(|| IpaymuError::invalid_timestamp(raw))
}

/// `CekSaldo.php`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceReply {
    pub username: String,
    pub balance: i64,
}

impl TryFrom<&RawFields> for BalanceReply {
    type Error = IpaymuError;

    fn try_from(fields: &RawFields) -> Result<Self, Self::Error> {
        Ok(Self {
            username: string_field(fields, "Username", Endpoint::Balance)?,
            balance: integer_field(fields, "Saldo", Endpoint::Balance)?,
        })
    }
}

/// `CekStatus.php`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountStatusReply {
    pub status_code: i64,
}

impl TryFrom<&RawFields> for AccountStatusReply {
    type Error = IpaymuError;

    fn try_from(fields: &RawFields) -> Result<Self, Self::Error> {
        Ok(Self {
            status_code: code_field(fields, "StatusUser", Endpoint::AccountStatus)?,
        })
    }
}

/// `CekTransaksi.php`
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionReply {
    pub status_code: i64,
    pub description: String,
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
    pub time: String,
    pub kind: String,
}

impl TryFrom<&RawFields> for TransactionReply {
    type Error = IpaymuError;

    fn try_from(fields: &RawFields) -> Result<Self, Self::Error> {
        let endpoint = Endpoint::Transaction;

        Ok(Self {
            status_code: code_field(fields, STATUS_FIELD, endpoint)?,
            description: string_field(fields, DESCRIPTION_FIELD, endpoint)?,
            sender: string_field(fields, "Pengirim", endpoint)?,
            receiver: string_field(fields, "Penerima", endpoint)?,
            amount: number_field(fields, "Nominal", endpoint)?,
            time: string_field(fields, "Waktu", endpoint)?,
            kind: string_field(fields, "Tipe", endpoint)?,
        })
    }
}

/// `payment.htm`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReply {
    pub session_id: Option<String>,
}

impl TryFrom<&RawFields> for PaymentReply {
    type Error = IpaymuError;

    fn try_from(fields: &RawFields) -> Result<Self, Self::Error> {
        let session_id = match fields.get("sessionID") {
            None | Some(Value::Null) => None,
            Some(_) => Some(string_field(fields, "sessionID", Endpoint::Payment)?),
        };
        Ok(Self { session_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn ok(body: Value) -> TransportResponse {
        TransportResponse::new(200, body.to_string())
    }

    fn object(value: Value) -> RawFields {
        match value {
            Value::Object(fields) => fields,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_empty_marker_is_success() {
        for marker in [json!(null), json!(""), json!("0"), json!(0), json!(false)] {
            let reply = ok(json!({ "Status": marker, "Username": "alice", "Saldo": "1" }));
            let fields = interpret(Endpoint::Balance, &reply).unwrap();
            assert_eq!(fields["Username"], "alice");
        }

        let reply = ok(json!({ "Username": "alice", "Saldo": "1" }));
        assert!(interpret(Endpoint::Balance, &reply).is_ok());
    }

    #[test]
    fn test_non_empty_marker_is_gateway_error() {
        let reply = ok(json!({ "Status": "-1001", "Keterangan": "invalid key" }));
        assert_eq!(
            interpret(Endpoint::Balance, &reply),
            Err(IpaymuError::gateway("-1001", "invalid key"))
        );
    }

    #[test]
    fn test_transaction_marker_without_record_is_gateway_error() {
        let reply = ok(json!({ "Status": "1", "Keterangan": "invalid key" }));
        assert_eq!(
            interpret(Endpoint::Transaction, &reply),
            Err(IpaymuError::gateway("1", "invalid key"))
        );
    }

    #[test]
    fn test_transaction_record_with_status_is_success() {
        let reply = ok(json!({
            "Status": 1, "Keterangan": "ok", "Pengirim": "alice", "Penerima": "bob",
            "Nominal": 10000, "Waktu": "2024-01-01 10:00:00", "Tipe": "transfer"
        }));
        assert!(interpret(Endpoint::Transaction, &reply).is_ok());
    }

    #[test]
    fn test_unparseable_body() {
        let reply = TransportResponse::new(200, "<html>oops</html>");
        assert!(matches!(
            interpret(Endpoint::Balance, &reply),
            Err(IpaymuError::MalformedResponse { .. })
        ));

        let reply = TransportResponse::new(502, "Bad Gateway");
        assert_eq!(
            interpret(Endpoint::Balance, &reply),
            Err(IpaymuError::transport("HTTP 502"))
        );

        let reply = ok(json!(["not", "an", "object"]));
        assert!(matches!(
            interpret(Endpoint::Balance, &reply),
            Err(IpaymuError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_non_success_status_with_empty_marker_is_transport_error() {
        let reply = TransportResponse::new(500, json!({ "Status": "" }).to_string());
        assert_eq!(
            interpret(Endpoint::Balance, &reply),
            Err(IpaymuError::transport("HTTP 500"))
        );

        let reply = TransportResponse::new(503, json!({}).to_string());
        assert_eq!(
            interpret(Endpoint::Balance, &reply),
            Err(IpaymuError::transport("HTTP 503"))
        );
    }

    #[test]
    fn test_non_success_status_with_marker_is_gateway_error() {
        let reply = TransportResponse::new(
            400,
            json!({ "Status": "-1001", "Keterangan": "invalid key" }).to_string(),
        );
        assert_eq!(
            interpret(Endpoint::Balance, &reply),
            Err(IpaymuError::gateway("-1001", "invalid key"))
        );
    }

    #[test]
    fn test_status_codes_must_be_exact_integers() {
        for code in [json!(2.7), json!("3.9"), json!("two")] {
            let result = AccountStatusReply::try_from(&object(json!({ "StatusUser": code })));
            assert!(matches!(result, Err(IpaymuError::InvalidField { .. })));
        }

        let reply = AccountStatusReply::try_from(&object(json!({ "StatusUser": " 2 " }))).unwrap();
        assert_eq!(reply.status_code, 2);
    }

    #[test]
    fn test_transaction_reply_rejects_fractional_status() {
        let result = TransactionReply::try_from(&object(json!({
            "Status": "1.5", "Keterangan": "ok", "Pengirim": "alice", "Penerima": "bob",
            "Nominal": 10000, "Waktu": "2024-01-01 10:00:00", "Tipe": "transfer"
        })));
        assert!(matches!(result, Err(IpaymuError::InvalidField { .. })));
    }

    #[test]
    fn test_transaction_reply_requires_status() {
        let result = TransactionReply::try_from(&object(json!({
            "Keterangan": "ok", "Pengirim": "alice", "Penerima": "bob",
            "Nominal": 10000, "Waktu": "2024-01-01 10:00:00", "Tipe": "transfer"
        })));
        assert_eq!(result, Err(IpaymuError::missing_field("Status", "transaction")));

        let reply = TransactionReply::try_from(&object(json!({
            "Status": "0", "Keterangan": "ok", "Pengirim": "alice", "Penerima": "bob",
            "Nominal": 10000, "Waktu": "2024-01-01 10:00:00", "Tipe": "transfer"
        })))
        .unwrap();
        assert_eq!(reply.status_code, 0);
    }

    #[test]
    fn test_balance_reply_coerces_to_integer() {
        let reply = BalanceReply::try_from(&object(json!({ "Username": "alice", "Saldo": "15000" })))
            .unwrap();
        assert_eq!(reply.balance, 15000);

        let reply =
            BalanceReply::try_from(&object(json!({ "Username": "alice", "Saldo": "15000.75" })))
                .unwrap();
        assert_eq!(reply.balance, 15000);

        let reply = BalanceReply::try_from(&object(json!({ "Username": "alice", "Saldo": 42 })))
            .unwrap();
        assert_eq!(reply.balance, 42);
    }

    #[test]
    fn test_balance_reply_missing_field() {
        let result = BalanceReply::try_from(&object(json!({ "Saldo": "1" })));
        assert_eq!(
            result,
            Err(IpaymuError::missing_field("Username", "balance"))
        );

        let result = BalanceReply::try_from(&object(json!({ "Username": "alice", "Saldo": "lots" })));
        assert!(matches!(result, Err(IpaymuError::InvalidField { .. })));
    }

    #[test]
    fn test_account_status_reply_accepts_string_code() {
        let reply = AccountStatusReply::try_from(&object(json!({ "StatusUser": "3" }))).unwrap();
        assert_eq!(reply.status_code, 3);
    }

    #[test]
    fn test_payment_reply_session() {
        let reply = PaymentReply::try_from(&object(json!({ "sessionID": "abc123" }))).unwrap();
        assert_eq!(reply.session_id.as_deref(), Some("abc123"));

        let reply = PaymentReply::try_from(&object(json!({}))).unwrap();
        assert!(reply.session_id.is_none());
    }

    #[test]
    fn test_parse_gateway_timestamp_local_time() {
        let timestamp = parse_gateway_timestamp("2024-01-01 10:00:00").unwrap();
        assert_eq!(timestamp.year(), 2024);
        assert_eq!(timestamp.hour(), 10);
        assert_eq!(timestamp.offset().local_minus_utc(), 7 * 3600);
        assert_eq!(timestamp.to_rfc3339(), "2024-01-01T10:00:00+07:00");
    }

    #[test]
    fn test_parse_gateway_timestamp_other_formats() {
        let rfc3339 = parse_gateway_timestamp("2024-01-01T03:00:00Z").unwrap();
        assert_eq!(rfc3339.to_rfc3339(), "2024-01-01T03:00:00+00:00");

        let date_only = parse_gateway_timestamp("2024-02-29").unwrap();
        assert_eq!(date_only.to_rfc3339(), "2024-02-29T00:00:00+07:00");

        assert_eq!(
            parse_gateway_timestamp("yesterday"),
            Err(IpaymuError::invalid_timestamp("yesterday"))
        );
    }
}
