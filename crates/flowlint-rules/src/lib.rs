//! # flowlint-rules
//!
//! Built-in considerations for flowlint.
//!
//! This crate provides the standard review considerations applied to
//! released automation documents, one file per rule.
//!
//! ## Available Considerations
//!
//! | Name | Applies to | Description |
//! |------|------------|-------------|
//! | `exception-details` | Objects, Processes | Exception stages carry a detail or preserve the current exception |
//! | `object-has-attach` | Objects | Base objects expose an Attach action |
//! | `actions-use-attach` | Objects | Actions begin by attaching to the application |
//! | `wait-timeout-terminates` | Objects | Wait timeouts resolve to an End or Exception |
//! | `navigate-followed-by-wait` | Objects | Navigate stages are followed by a wait |
//! | `action-page-size` | Objects | Action pages stay below the stage-count ceiling |
//! | `win32-element-naming` | Objects | Win32-spied elements carry meaningful names |
//! | `start-end-documented` | Processes | Start and End stages narrate the flow |
//!
//! ## Usage
//!
//! ```ignore
//! use flowlint_core::{Document, Engine, Metadata};
//! use flowlint_rules::registry;
//!
//! let document = Document::parse(&xml)?;
//! let metadata = Metadata::from_header(document.header())?;
//! let report = Engine::new(&metadata, registry()).run(&document);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod action_page_size;
mod actions_use_attach;
mod exception_details;
mod navigate_followed_by_wait;
mod object_has_attach;
mod registry;
mod start_end_documented;
#[cfg(test)]
mod support;
mod wait_timeout_terminates;
mod win32_element_naming;

pub use action_page_size::{ActionPageSize, MAX_PAGE_STAGES};
pub use actions_use_attach::ActionsUseAttach;
pub use exception_details::ExceptionDetails;
pub use navigate_followed_by_wait::NavigateFollowedByWait;
pub use object_has_attach::ObjectHasAttach;
pub use registry::registry;
pub use start_end_documented::StartEndDocumented;
pub use wait_timeout_terminates::WaitTimeoutTerminates;
pub use win32_element_naming::Win32ElementNaming;
