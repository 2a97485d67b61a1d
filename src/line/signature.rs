use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{BotError, Result};

pub const SIGNATURE_HEADER: &str = "x-line-signature";

type HmacSha256 = Hmac<Sha256>;

pub fn sign(channel_secret: &str, body: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .map_err(|e| BotError::Config(format!("Unusable channel secret: {}", e)))?;
    mac.update(body);
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Checks `X-Line-Signature`: base64 HMAC-SHA256 of the raw body keyed by the channel secret.
pub fn verify(channel_secret: &str, body: &[u8], signature: Option<&str>) -> Result<()> {
    let signature = signature.ok_or(BotError::Signature)?;
    let decoded = STANDARD
        .decode(signature.trim())
        .map_err(|_| BotError::Signature)?;

    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .map_err(|_| BotError::Signature)?;
    mac.update(body);
    mac.verify_slice(&decoded).map_err(|_| BotError::Signature)
}
