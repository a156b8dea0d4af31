fn base(domain: &str) -> &str {
    domain.strip_suffix('/').unwrap_or(domain)
}

/// Customer-facing GraphQL endpoint for a shop domain.
pub fn shop_endpoint(domain: &str) -> String {
    format!("{}/shop-api", base(domain))
}

/// Administrator GraphQL endpoint for a shop domain.
pub fn admin_endpoint(domain: &str) -> String {
    format!("{}/admin-api", base(domain))
}
