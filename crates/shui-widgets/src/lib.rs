//! Accessible behaviours for the **shui** element tree.
//!
//! Every behaviour implements [`shui_core::Component`]: it binds to elements
//! of a [`shui_core::Document`], handles the [`shui_core::DomEvent`]s that
//! target them, and renders a default terminal view with [`ratatui`].
//!
//! # Behaviours
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`menu`] | Menu button with roving highlight, type-ahead and outside dismissal |
//! | [`toggle`] | Pressed/unpressed toggle button |
//!
//! # Utilities
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`walker`] | Filtered live cursor over a subtree |
//! | [`id`] | Process-wide element id generation |
//! | [`key`] | Key-binding helpers |
//! | [`runeutil`] | Unicode-aware label width, truncation and matching |

pub mod id;
pub mod key;
pub mod menu;
pub mod runeutil;
pub mod toggle;
pub mod walker;
