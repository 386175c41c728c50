//! Services shared by every stage of a sync run.

use crate::config::SyncSettings;
use crate::notify::Notifier;
use crate::platform::CodeHost;
use crate::templates::TemplateRenderer;
use crate::vcs::Cloner;
use std::sync::Arc;

/// Everything a sync stage needs besides its direct inputs.
///
/// Built once per run and borrowed by the driver and the orchestrator.
pub struct SyncContext {
    /// Code host API.
    pub host: Arc<dyn CodeHost>,

    /// Creates enterprise working copies.
    pub cloner: Arc<dyn Cloner>,

    /// Receives one summary per pair.
    pub notifier: Arc<dyn Notifier>,

    pub renderer: TemplateRenderer,

    pub settings: SyncSettings,
}

impl SyncContext {
    /// Creates a context with a default renderer.
    pub fn new(
        host: Arc<dyn CodeHost>,
        cloner: Arc<dyn Cloner>,
        notifier: Arc<dyn Notifier>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            host,
            cloner,
            notifier,
            renderer: TemplateRenderer::new(),
            settings,
        }
    }
}
