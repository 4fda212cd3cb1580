/// Constructs and copies matrix elements on behalf of the fallible
/// constructors.
///
/// Implementations may fail on any call; the matrix that asked for the
/// element releases everything built so far and reports the failure as
/// [`MatrixError::Element`](crate::error::MatrixError::Element).
pub trait ElementSource<T> {
    /// Produce a default-valued element.
    fn try_default(&mut self) -> anyhow::Result<T>;

    /// Produce an independent copy of `value`.
    fn try_copy(&mut self, value: &T) -> anyhow::Result<T>;
}

/// Element source backed by `Default` and `Clone`. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdSource;

impl<T> ElementSource<T> for StdSource
where
    T: Default + Clone,
{
    fn try_default(&mut self) -> anyhow::Result<T> {
        Ok(T::default())
    }

    fn try_copy(&mut self, value: &T) -> anyhow::Result<T> {
        Ok(value.clone())
    }
}
