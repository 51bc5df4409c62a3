//! From-scratch AWS Signature Version 4 for a single-object PUT.
//!
//! No SDK, no ambient credential helpers: the canonical request, the
//! string-to-sign, and the four-step HMAC key derivation are spelled out
//! here exactly as the protocol defines them. Everything is a pure function
//! of its inputs, including the timestamp, so signing is deterministic and
//! unit-testable.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const TERMINATOR: &str = "aws4_request";
/// Lowercase, sorted, semicolon-joined. The canonical header block below
/// must list exactly these, in this order.
const SIGNED_HEADERS: &str = "content-type;host;x-amz-content-sha256;x-amz-date";

/// One PUT request to be signed. `path` must already be percent-encoded per
/// the S3 rules (object keys produced by this crate only contain
/// `[A-Za-z0-9._-]`, so no encoding is ever needed in practice) and carries
/// no query string.
pub struct SigningRequest<'a> {
    pub method: &'a str,
    pub host: &'a str,
    pub path: &'a str,
    pub content_type: &'a str,
    pub payload: &'a [u8],
    /// Captured once by the caller; used for both `x-amz-date` and the
    /// credential-scope date. Skew between the two breaks the signature.
    pub timestamp: DateTime<Utc>,
}

/// Long-term key material. Missing values are the caller's problem; this
/// layer never fails.
pub struct Credentials<'a> {
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub region: &'a str,
}

/// The three headers the signature covers besides `content-type` and
/// `host`, returned together so callers cannot recompute one of them with a
/// different timestamp or payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub authorization: String,
    pub amz_date: String,
    pub content_sha256: String,
}

/// Computes the `Authorization` header (and the `x-amz-date` /
/// `x-amz-content-sha256` values it is bound to) for the request.
pub fn sign(request: &SigningRequest<'_>, credentials: &Credentials<'_>) -> SignedHeaders {
    let amz_date = request.timestamp.format("%Y%m%dT%H%M%SZ").to_string();
    let date_stamp = request.timestamp.format("%Y%m%d").to_string();
    let payload_hash = sha256_hex(request.payload);

    let canonical = canonical_request(request, &amz_date, &payload_hash);
    let scope = format!("{date_stamp}/{}/{SERVICE}/{TERMINATOR}", credentials.region);
    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        sha256_hex(canonical.as_bytes())
    );

    let signing_key = derive_signing_key(
        credentials.secret_access_key,
        &date_stamp,
        credentials.region,
    );
    let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

    let authorization = format!(
        "{ALGORITHM} Credential={}/{scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
        credentials.access_key_id
    );

    SignedHeaders {
        authorization,
        amz_date,
        content_sha256: payload_hash,
    }
}

/// Newline-joined: method, path, empty query-string slot, the canonical
/// header block (each `key:value\n`), the signed-header list, and the hex
/// payload digest.
fn canonical_request(request: &SigningRequest<'_>, amz_date: &str, payload_hash: &str) -> String {
    let canonical_headers = format!(
        "content-type:{}\nhost:{}\nx-amz-content-sha256:{payload_hash}\nx-amz-date:{amz_date}\n",
        request.content_type, request.host
    );
    format!(
        "{}\n{}\n\n{canonical_headers}\n{SIGNED_HEADERS}\n{payload_hash}",
        request.method, request.path
    )
}

/// kSecret → kDate → kRegion → kService → kSigning.
fn derive_signing_key(secret: &str, date_stamp: &str, region: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date_stamp.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, SERVICE.as_bytes());
    hmac_sha256(&k_service, TERMINATOR.as_bytes())
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
