use middleware::extractor::ExtractionMiddleware;

pub mod middleware {
    pub mod extractor;
}

/// Decodes the `Authorization` bearer token and stores the claims result in
/// the request extensions, where the auth guards pick it up.
pub fn middleware() -> ExtractionMiddleware {
    ExtractionMiddleware::new()
}
