pub trait ObjectStore {
    fn put_object(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), String>;
}

impl<F> ObjectStore for F
where
    F: Fn(&str, &str, &[u8]) -> Result<(), String>,
{
    fn put_object(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), String> {
        self(bucket, key, body)
    }
}
