// src/ui/mod.rs

//! Terminal dashboard.
//!
//! - [`app`] owns the terminal and the key/redraw loop.
//! - [`render`] draws one page of job panes.
//! - [`pager`] tracks which page is visible.
//!
//! Every job file becomes a [`Page`]. Schedulers reach the UI through a
//! [`PageSink`], which tags their updates with the page index and forwards
//! them over a channel drained by the UI thread.

pub mod app;
pub mod pager;
pub mod render;

use tokio::sync::mpsc;

use crate::engine::{Coordinator, JobUpdate, UpdateSink};
use crate::job::{Group, SharedJob};

pub use app::{Dashboard, KeyAction, action_for_key, restore_terminal};
pub use pager::Pager;

/// Jobs of one job file, laid out in display groups.
#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    pub groups: Vec<Group<SharedJob>>,
}

impl Page {
    pub fn new(title: impl Into<String>, groups: Vec<Group<SharedJob>>) -> Self {
        Self {
            title: title.into(),
            groups,
        }
    }

    /// Page showing the jobs owned by `coordinator`.
    pub fn from_coordinator(title: impl Into<String>, coordinator: &Coordinator) -> Self {
        Self::new(title, coordinator.groups().to_vec())
    }
}

/// An update tagged with the page it belongs to.
#[derive(Debug, Clone)]
pub struct PageUpdate {
    pub page: usize,
    pub update: JobUpdate,
}

/// `UpdateSink` feeding the dashboard channel for one page.
#[derive(Debug, Clone)]
pub struct PageSink {
    page: usize,
    tx: mpsc::UnboundedSender<PageUpdate>,
}

impl PageSink {
    pub fn new(page: usize, tx: mpsc::UnboundedSender<PageUpdate>) -> Self {
        Self { page, tx }
    }
}

impl UpdateSink for PageSink {
    fn notify(&self, update: JobUpdate) {
        let _ = self.tx.send(PageUpdate {
            page: self.page,
            update,
        });
    }
}
