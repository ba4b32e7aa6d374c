use std::sync::Arc;

use crate::tool::MediaTool;

#[derive(Clone)]
pub struct AppState {
    pub tool: Arc<dyn MediaTool>
}

impl AppState {
    pub fn new(tool: impl MediaTool + 'static) -> Self {
        Self {
            tool: Arc::new(tool)
        }
    }
}
