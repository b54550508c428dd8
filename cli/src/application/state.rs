use std::sync::Arc;

use larder_core::{
    application::{LarderService, create_service},
    domain::common::LarderConfig,
};

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: LarderService,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: LarderService) -> Self {
        Self { args, service }
    }
}

pub fn state(args: Args) -> Result<AppState, anyhow::Error> {
    let args = Arc::new(args);
    let config = LarderConfig::from(args.as_ref().clone());
    let service = create_service(config)?;

    Ok(AppState::new(args, service))
}
