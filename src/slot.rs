//! Last-known-good model slot.
//!
//! A refresh builds a brand-new model and swaps it in only once populate and
//! validation both succeed. Readers keep whatever `Arc` they hold; a failed
//! refresh leaves the published model untouched.

use crate::builder::{populate_with_hostnames, PopulateMode};
use crate::document::{DocumentQuery, ParseContext};
use crate::error::Result;
use crate::models::{HostnameCache, NetworkModel};
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
pub struct ModelSlot {
    current: RwLock<Option<Arc<NetworkModel>>>,
    hostnames: HostnameCache,
}

impl ModelSlot {
    pub fn new() -> Self {
        ModelSlot::default()
    }

    /// A slot whose models all carry a copy of `hostnames`.
    pub fn with_hostnames(hostnames: HostnameCache) -> Self {
        ModelSlot {
            current: RwLock::new(None),
            hostnames,
        }
    }

    /// The published model, if any refresh has succeeded yet.
    pub fn current(&self) -> Option<Arc<NetworkModel>> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Parse `text` with `ctx` and refresh from the resulting document.
    pub fn refresh(&self, ctx: &ParseContext, text: &str, mode: PopulateMode) -> Result<Arc<NetworkModel>> {
        let doc = ctx.parse(text)?;
        self.refresh_from(&doc, mode)
    }

    /// Build a fresh model from `doc` and publish it.
    ///
    /// # Returns
    /// * `Ok(Arc<NetworkModel>)` - The newly published model, or for
    ///   [`PopulateMode::None`] the model already published (an empty one if
    ///   there is none yet, which is not published)
    /// * `Err` - The populate error; the previous model stays published
    pub fn refresh_from<D: DocumentQuery>(&self, doc: &D, mode: PopulateMode) -> Result<Arc<NetworkModel>> {
        if mode == PopulateMode::None {
            log::debug!("populate mode NONE, keeping model version {}", self.current_version());
            return Ok(self.current().unwrap_or_else(|| Arc::new(NetworkModel::new())));
        }
        let model = match populate_with_hostnames(doc, mode, self.hostnames.clone()) {
            Ok(model) => Arc::new(model),
            Err(e) => {
                log::error!("keeping previous model (version {}): {e}", self.current_version());
                return Err(e);
            }
        };
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(Arc::clone(&model));
        log::debug!("published model version {}", model.version);
        Ok(model)
    }

    fn current_version(&self) -> String {
        self.current()
            .map(|m| m.version.clone())
            .unwrap_or_else(|| "none".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GniError;

    const GOOD: &str = r#"<network-data version="7" applied-version="6">
  <configuration>
    <property name="mode"><value>EDGE</value></property>
    <property name="enabledCLCIp"><value>10.0.0.1</value></property>
    <property name="instanceDNSDomain"><value>eucalyptus.internal</value></property>
    <property name="instanceDNSServers"><value>10.0.0.2</value></property>
  </configuration>
</network-data>"#;

    const BAD: &str = r#"<network-data version="8">
  <configuration>
    <property name="mode"><value>EDGE</value></property>
  </configuration>
</network-data>"#;

    #[test]
    fn test_refresh_publishes_valid_model() {
        let slot = ModelSlot::new();
        assert!(slot.current().is_none());
        let ctx = ParseContext::new();
        let model = slot.refresh(&ctx, GOOD, PopulateMode::All).unwrap();
        assert_eq!(model.version, "7");
        assert_eq!(slot.current().map(|m| m.version.clone()), Some("7".to_string()));
    }

    #[test]
    fn test_failed_refresh_keeps_previous_model() {
        let slot = ModelSlot::new();
        let ctx = ParseContext::new();
        let first = slot.refresh(&ctx, GOOD, PopulateMode::All).unwrap();

        assert!(matches!(
            slot.refresh(&ctx, BAD, PopulateMode::All),
            Err(GniError::Validation(_))
        ));
        assert!(slot.refresh(&ctx, "<not-xml", PopulateMode::All).is_err());

        let current = slot.current().unwrap();
        assert!(Arc::ptr_eq(&first, &current));
        assert_eq!(current.version, "7");
    }

    #[test]
    fn test_none_refresh_keeps_published_model() {
        let slot = ModelSlot::new();
        let ctx = ParseContext::new();
        assert!(slot.refresh(&ctx, GOOD, PopulateMode::None).unwrap().version.is_empty());
        assert!(slot.current().is_none());

        let first = slot.refresh(&ctx, GOOD, PopulateMode::All).unwrap();
        let kept = slot.refresh(&ctx, GOOD, PopulateMode::None).unwrap();
        assert!(Arc::ptr_eq(&first, &kept));
        assert_eq!(slot.current().map(|m| m.version.clone()), Some("7".to_string()));
    }

    #[test]
    fn test_hostnames_are_attached() {
        let slot = ModelSlot::with_hostnames(HostnameCache::new(vec![("10.0.1.10", "node1")]));
        let model = slot
            .refresh(&ParseContext::new(), GOOD, PopulateMode::All)
            .unwrap();
        assert_eq!(model.hostnames.lookup("10.0.1.10"), Some("node1"));
    }
}
