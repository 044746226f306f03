// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::BTreeMap, fmt::Debug, sync::Arc};

use crate::CommandHandler;

/// Command name to handler.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: BTreeMap<String, Arc<dyn CommandHandler>>,
}

impl Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.handlers.keys()).finish()
    }
}

impl CommandRegistry {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Add a handler under its own name, replacing any previous one.
    #[must_use]
    pub fn with(mut self, handler: impl CommandHandler + 'static) -> Self {
        self.register(Arc::new(handler));
        self
    }

    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(handler.name().to_string(), handler);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Sorted command names.
    #[must_use]
    pub fn names(&self) -> Vec<String> { self.handlers.keys().cloned().collect() }

    pub fn handlers(&self) -> impl Iterator<Item = &Arc<dyn CommandHandler>> { self.handlers.values() }
}
