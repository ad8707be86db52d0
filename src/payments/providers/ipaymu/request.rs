//! Outbound request construction
//!
//! Every call carries the API key and `format=json`. The HTTP method is a
//! property of the endpoint: queries go out as GET, payment submission as a
//! form-urlencoded POST. Parameter values are not validated here; the
//! gateway is the authority on what it accepts.

use crate::config::{CallbackUrls, IpaymuConfig};
use crate::error::{IpaymuError, IpaymuResult};
use crate::payments::types::{LineItems, Product, TransactionRequest};
use crate::transport::{GatewayRequest, HttpMethod, Params};

const API_ROOT: &str = "api";

pub const KEY_PARAM: &str = "key";
pub const FORMAT_PARAM: &str = "format";
pub const OUTPUT_FORMAT: &str = "json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Balance,
    AccountStatus,
    Transaction,
    Payment,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Balance => "CekSaldo.php",
            Endpoint::AccountStatus => "CekStatus.php",
            Endpoint::Transaction => "CekTransaksi.php",
            Endpoint::Payment => "payment.htm",
        }
    }

    pub fn method(self) -> HttpMethod {
        match self {
            Endpoint::Payment => HttpMethod::Post,
            _ => HttpMethod::Get,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Balance => "balance",
            Endpoint::AccountStatus => "account status",
            Endpoint::Transaction => "transaction",
            Endpoint::Payment => "payment",
        }
    }

    /// Field whose presence marks a reply as a record even when `Status`
    /// is set. The transaction query reuses `Status` for the lifecycle code.
    pub(crate) fn record_field(self) -> Option<&'static str> {
        match self {
            Endpoint::Transaction => Some("Waktu"),
            _ => None,
        }
    }
}

/// Finalizes parameters for one gateway call.
pub struct RequestBuilder<'a> {
    config: &'a IpaymuConfig,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a IpaymuConfig) -> Self {
        Self { config }
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            API_ROOT,
            endpoint.path()
        )
    }

    pub fn build(&self, endpoint: Endpoint, mut params: Params) -> GatewayRequest {
        params.push((KEY_PARAM.to_string(), self.config.api_key.clone()));
        params.push((FORMAT_PARAM.to_string(), OUTPUT_FORMAT.to_string()));

        GatewayRequest {
            method: endpoint.method(),
            url: self.url(endpoint),
            params,
        }
    }
}

fn push(params: &mut Params, name: impl Into<String>, value: impl Into<String>) {
    params.push((name.into(), value.into()));
}

fn format_amount(value: f64) -> String {
    value.to_string()
}

fn alt_price(product: &Product) -> IpaymuResult<f64> {
    product
        .price_in_alt_currency
        .ok_or_else(|| IpaymuError::MissingAltCurrencyPrice {
            product: product.name.clone(),
        })
}

/// Parameters for a payment submission.
///
/// Multiple products are encoded as indexed fields (`product[0]`,
/// `price[0]`, ...), one group per field, in line item order.
pub fn payment_params(
    request: &TransactionRequest,
    alt_payment_account: Option<&str>,
    urls: &CallbackUrls,
) -> IpaymuResult<Params> {
    let mut params = Params::new();
    push(&mut params, "action", "payment");
    push(&mut params, "invoice_number", request.id.as_str());

    let with_alt_price = alt_payment_account.is_some();

    match &request.items {
        LineItems::Single(product) => {
            push(&mut params, "product", product.name.as_str());
            push(&mut params, "price", format_amount(product.price));
            push(&mut params, "quantity", product.quantity.to_string());

            if let Some(description) = &product.description {
                push(&mut params, "comments", description.as_str());
            }

            if with_alt_price {
                push(&mut params, "paypal_price", format_amount(alt_price(product)?));
            }
        }
        LineItems::Multiple(products) => {
            for (index, product) in products.iter().enumerate() {
                push(&mut params, format!("product[{}]", index), product.name.as_str());
            }
            for (index, product) in products.iter().enumerate() {
                push(&mut params, format!("price[{}]", index), format_amount(product.price));
            }
            for (index, product) in products.iter().enumerate() {
                push(
                    &mut params,
                    format!("quantity[{}]", index),
                    product.quantity.to_string(),
                );
            }
            for (index, product) in products.iter().enumerate() {
                push(
                    &mut params,
                    format!("comments[{}]", index),
                    product.description.clone().unwrap_or_default(),
                );
            }
            if with_alt_price {
                for (index, product) in products.iter().enumerate() {
                    push(
                        &mut params,
                        format!("paypal_price[{}]", index),
                        format_amount(alt_price(product)?),
                    );
                }
            }
        }
    }

    if let Some(url) = &urls.return_url {
        push(&mut params, "ureturn", url.as_str());
    }
    if let Some(url) = &urls.notify_url {
        push(&mut params, "unotify", url.as_str());
    }
    if let Some(url) = &urls.cancel_url {
        push(&mut params, "ucancel", url.as_str());
    }

    if let Some(account) = alt_payment_account {
        push(&mut params, "paypal_email", account);
    }

    Ok(params)
}
