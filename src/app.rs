use axum::extract::FromRef;
use std::sync::Arc;

use crate::{
    core::CoreArc,
    gate::Gate
};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub core: CoreArc,
    pub gate: Arc<Gate>
}
