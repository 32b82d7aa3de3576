use super::message::Method;
use bytes::Bytes;

/// Maps outbound queries to transaction ids and inbound transaction ids back
/// to the kind of query they answer.
///
/// No per-request state is kept by [`MethodLabels`]; an implementation that
/// tracks unique ids with expiry can be swapped in without touching dispatch.
pub trait TransactionScheme: Send + Sync {
    fn label(&self, method: Method) -> Bytes;

    fn correlate(&self, transaction: &[u8]) -> Option<Method>;
}

/// Uses the method name itself as the transaction id.
///
/// Responses are attributed to a *kind* of query only. Two `find_node`
/// queries in flight at once cannot be told apart.
#[derive(Debug, Default, Clone, Copy)]
pub struct MethodLabels;

impl TransactionScheme for MethodLabels {
    fn label(&self, method: Method) -> Bytes {
        Bytes::from_static(method.as_str().as_bytes())
    }

    fn correlate(&self, transaction: &[u8]) -> Option<Method> {
        Method::from_bytes(transaction)
    }
}
