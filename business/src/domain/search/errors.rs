/// Provider errors for the search adapters.
/// Use code-style identifiers for all error variants for i18n compatibility.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The image reference is not network-reachable (local or in-memory
    /// blob); the provider call was never attempted.
    #[error("provider.unreachable_reference")]
    UnreachableReference,
    #[error("provider.timeout")]
    Timeout,
    #[error("provider.http_error")]
    Http(u16),
    #[error("provider.auth_missing")]
    AuthMissing,
    #[error("provider.network")]
    Network,
    #[error("provider.invalid_response")]
    InvalidResponse,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Neither a query nor an image reference was supplied.
    #[error("search.empty_request")]
    EmptyRequest,
}
