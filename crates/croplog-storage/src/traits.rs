/// Raw text storage the JSON layer sits on.
///
/// Implementations are durable (sqlite file) or in-memory (tests). The layer
/// above never sees raw text; it only sees typed values or its own defaults.
pub trait StoreBackend: Send + Sync {
    fn read(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
    fn clear(&self) -> anyhow::Result<()>;
}
