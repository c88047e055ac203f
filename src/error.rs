/// Errors surfaced by a transaction fetch.
///
/// Every variant is terminal for the fetch attempt: there is no retry and no
/// partial result.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure, a non-2xx status, or a body that is not the
    /// expected JSON shape. The cause chain is kept in the inner error.
    #[error("failed to fetch transactions: {0:#}")]
    Fetch(#[source] anyhow::Error),

    /// A transaction carried fewer than the two category levels needed to
    /// build `"<primary> - <secondary>"`.
    #[error(
        "transaction {transaction_id:?} has {found} category level(s); expected at least 2"
    )]
    CategoryFormat { transaction_id: String, found: usize },
}

impl Error {
    pub fn fetch(err: impl Into<anyhow::Error>) -> Self {
        Self::Fetch(err.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
