use crate::constants::DEFAULT_REGION;

/// Resolve the signing region for an AGCOD endpoint host.
///
/// AGCOD runs one production and one sandbox (`-gamma`) host per
/// marketplace group. Hosts outside that table sign for `us-east-1`.
///
/// | Hosts | Region |
/// |-------|--------|
/// | `agcod-v2.amazon.com`, `agcod-v2-gamma.amazon.com` | `us-east-1` |
/// | `agcod-v2-eu.amazon.com`, `agcod-v2-eu-gamma.amazon.com` | `eu-west-1` |
/// | `agcod-v2-fe.amazon.com`, `agcod-v2-fe-gamma.amazon.com` | `us-west-2` |
pub fn region_for(endpoint: &str) -> &'static str {
    match endpoint {
        // North America: USD, CAD, MXN
        "agcod-v2.amazon.com" | "agcod-v2-gamma.amazon.com" => "us-east-1",
        // Europe: EUR, GBP
        "agcod-v2-eu.amazon.com" | "agcod-v2-eu-gamma.amazon.com" => "eu-west-1",
        // Far East: JPY, AUD
        "agcod-v2-fe.amazon.com" | "agcod-v2-fe-gamma.amazon.com" => "us-west-2",
        _ => DEFAULT_REGION,
    }
}

/// Returns true if the endpoint is one of the AGCOD sandbox hosts.
pub fn is_sandbox(endpoint: &str) -> bool {
    endpoint.ends_with("-gamma.amazon.com")
}
