//! Application Context
//!
//! Shared controller handle provided via Leptos Context API.

use std::future::Future;
use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ItemClient;
use crate::controller::ListController;
use crate::notify::ToastNotifier;

/// The controller wired to the HTTP client and toasts
pub type Dashboard = ListController<ItemClient, ToastNotifier>;

#[derive(Clone)]
pub struct DashboardContext {
    controller: Arc<Dashboard>,
    /// Toast queue rendered by the toaster
    pub notifier: ToastNotifier,
}

impl DashboardContext {
    pub fn new(controller: Dashboard, notifier: ToastNotifier) -> Self {
        Self {
            controller: Arc::new(controller),
            notifier,
        }
    }

    pub fn controller(&self) -> &Dashboard {
        &self.controller
    }

    /// Run an async controller operation on the browser event loop
    pub fn run<F, Fut>(&self, op: F)
    where
        F: FnOnce(Arc<Dashboard>) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        spawn_local(op(self.controller.clone()));
    }
}

pub fn use_dashboard() -> DashboardContext {
    use_context::<DashboardContext>().expect("DashboardContext should be provided")
}
