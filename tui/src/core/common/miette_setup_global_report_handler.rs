// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Installs the report handler used when `main() -> miette::Result<_>` returns an error.
//! The hook is lazy, so the terminal width is only measured if an error is actually
//! displayed.

use miette::MietteHandlerOpts;

pub const DEFAULT_TERMINAL_WIDTH: u16 = 80;

pub fn setup_default_miette_global_report_handler(footer: &'static str) {
    miette::set_hook(Box::new(move |_report| {
        let terminal_width = crossterm::terminal::size()
            .map_or(DEFAULT_TERMINAL_WIDTH, |(columns, _rows)| columns);
        tracing::debug!(message = "miette report hook", terminal_width);
        Box::new(
            MietteHandlerOpts::new()
                .width(usize::from(terminal_width))
                .wrap_lines(true)
                .unicode(true)
                .context_lines(3)
                .tab_width(4)
                .with_cause_chain()
                .footer(footer.to_string())
                .build(),
        )
    }))
    .ok();
}
