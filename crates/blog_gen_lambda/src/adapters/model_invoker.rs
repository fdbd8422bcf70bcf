pub trait ModelInvoker {
    /// Sends a JSON request body to `model_id` and returns the raw reply body.
    fn invoke_model(&self, model_id: &str, body: &[u8]) -> Result<Vec<u8>, String>;
}

impl<F> ModelInvoker for F
where
    F: Fn(&str, &[u8]) -> Result<Vec<u8>, String>,
{
    fn invoke_model(&self, model_id: &str, body: &[u8]) -> Result<Vec<u8>, String> {
        self(model_id, body)
    }
}
