//! # Shell
//!
//! The interactive prompt loop.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Terminal Session                                 │
//! │                                                                         │
//! │  restore ──► Resumed ──────────────────────────────┐                    │
//! │     │                                              │                    │
//! │     ├──► Prefill (stored owner/budget as defaults) │                    │
//! │     ▼                                              ▼                    │
//! │  Your name: ──► Welcome, Ana! ──► Budget: ──► > add / list / remove     │
//! │     ▲                                           │   total / help        │
//! │     │                                           │                       │
//! │     └───────────────── reset ◄──────────────────┤                       │
//! │                                                 ├──► finalize: summary, │
//! │                                                 │    farewell, reset    │
//! │                                                 └──► quit: snapshot kept│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Generic over its input, output and persistence so tests can drive it with
//! in-memory buffers.

use std::io::{self, BufRead, Write};

use tally_core::validation::{validate_budget, validate_owner_name};
use tally_core::{
    CartError, CartPhase, CartStore, Commit, Money, RestoreOutcome, SessionPersistence,
};
use tracing::{debug, info};

use crate::command::{Command, HELP};
use crate::config::AppConfig;
use crate::render;

/// Why [`Shell::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellExit {
    /// The user typed `quit`; the snapshot stays for next time.
    Quit,
    /// The purchase was finalized and the cart reset.
    Finalized,
    /// Input ran out.
    EndOfInput,
}

pub struct Shell<R, W, P> {
    input: R,
    output: W,
    cart: CartStore<P>,
    restored: Option<RestoreOutcome>,
    config: AppConfig,
}

impl<R, W, P> Shell<R, W, P>
where
    R: BufRead,
    W: Write,
    P: SessionPersistence,
{
    /// Restores whatever `persistence` holds and prepares the loop.
    pub fn new(input: R, output: W, persistence: P, config: AppConfig) -> Self {
        let (cart, outcome) = CartStore::restore(persistence);
        Shell {
            input,
            output,
            cart,
            restored: Some(outcome),
            config,
        }
    }

    pub fn cart(&self) -> &CartStore<P> {
        &self.cart
    }

    pub fn into_parts(self) -> (CartStore<P>, W) {
        (self.cart, self.output)
    }

    pub fn run(&mut self) -> io::Result<ShellExit> {
        writeln!(
            self.output,
            "Tally - shopping on a budget. Type 'help' for commands."
        )?;

        let mut defaults = match self.restored.take() {
            Some(RestoreOutcome::Resumed { .. }) => {
                let owner = self.cart.owner().unwrap_or_default().to_string();
                writeln!(self.output, "Welcome back, {}! Your cart was restored.", owner)?;
                self.show_cart()?;
                None
            }
            Some(RestoreOutcome::Prefill { owner, budget }) => Some((owner, budget)),
            Some(RestoreOutcome::Fresh) | None => None,
        };

        loop {
            if self.cart.phase() == CartPhase::Uninitialized && !self.setup(defaults.take())? {
                return Ok(ShellExit::EndOfInput);
            }

            let Some(line) = self.prompt("> ")? else {
                return Ok(ShellExit::EndOfInput);
            };

            match line.parse::<Command>() {
                Ok(command) => {
                    debug!(?command, "Shell command");
                    if let Some(exit) = self.execute(command)? {
                        return Ok(exit);
                    }
                }
                Err(err) => writeln!(self.output, "{}", err)?,
            }
        }
    }

    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------

    /// Asks for owner and budget until both are valid, then initializes the
    /// cart. Returns `false` when input runs out first.
    fn setup(&mut self, defaults: Option<(String, Money)>) -> io::Result<bool> {
        let (default_owner, default_budget) = match defaults {
            Some((owner, budget)) => (Some(owner), Some(budget.to_decimal_string())),
            None => (None, None),
        };

        let Some(owner) = self.ask("Your name", default_owner.as_deref(), validate_owner_name)? else {
            return Ok(false);
        };
        writeln!(self.output, "Welcome, {}!", owner)?;

        let Some(budget) = self.ask("Your budget", default_budget.as_deref(), validate_budget)? else {
            return Ok(false);
        };

        match self.cart.initialize(&owner, &budget.to_decimal_string()) {
            Ok(commit) => {
                self.warn_if_unsaved(&commit)?;
                let budget = self.config.format_currency(budget);
                writeln!(self.output, "Budget set to {}. Start adding products.", budget)?;
            }
            Err(err) => self.show_error(&err)?,
        }

        Ok(true)
    }

    /// Prompts until `validate` accepts the answer. An empty answer takes
    /// `default` when there is one.
    fn ask<T, E, F>(&mut self, label: &str, default: Option<&str>, validate: F) -> io::Result<Option<T>>
    where
        E: std::fmt::Display,
        F: Fn(&str) -> Result<T, E>,
    {
        let label = match default {
            Some(value) => format!("{} [{}]: ", label, value),
            None => format!("{}: ", label),
        };

        loop {
            let Some(answer) = self.prompt(&label)? else {
                return Ok(None);
            };
            let answer = match default {
                Some(value) if answer.trim().is_empty() => value.to_string(),
                _ => answer,
            };

            match validate(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(err) => writeln!(self.output, "  ! {}", err)?,
            }
        }
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    fn execute(&mut self, command: Command) -> io::Result<Option<ShellExit>> {
        match command {
            Command::Add => return self.add(),
            Command::List => self.show_cart()?,
            Command::Remove(number) => self.remove(number)?,
            Command::Total => {
                let line = render::totals_line(&self.cart.totals(), &self.config);
                writeln!(self.output, "{}", line)?;
            }
            Command::Finalize => return self.finalize(),
            Command::Reset => {
                let commit = self.cart.reset();
                self.warn_if_unsaved(&commit)?;
                writeln!(self.output, "Cart cleared. Let's start over.")?;
            }
            Command::Help => writeln!(self.output, "{}", HELP)?,
            Command::Quit => {
                writeln!(self.output, "Your cart is saved for next time. Bye!")?;
                return Ok(Some(ShellExit::Quit));
            }
        }
        Ok(None)
    }

    fn add(&mut self) -> io::Result<Option<ShellExit>> {
        let Some(name) = self.prompt("  Product name: ")? else {
            return Ok(Some(ShellExit::EndOfInput));
        };
        let Some(price) = self.prompt("  Price: ")? else {
            return Ok(Some(ShellExit::EndOfInput));
        };
        let Some(quantity) = self.prompt("  Quantity: ")? else {
            return Ok(Some(ShellExit::EndOfInput));
        };

        match self.cart.add_item(&name, &price, &quantity) {
            Ok(commit) => {
                self.warn_if_unsaved(&commit)?;
                let added = commit.into_value();
                if added.merged {
                    writeln!(
                        self.output,
                        "Updated {}: quantity now {}.",
                        added.item.name, added.item.quantity
                    )?;
                } else {
                    writeln!(
                        self.output,
                        "Added {} x {} at {}.",
                        added.item.quantity,
                        added.item.name,
                        self.config.format_currency(added.item.price)
                    )?;
                }
                let remaining = self.config.format_currency(added.remaining);
                writeln!(self.output, "Remaining budget: {}", remaining)?;
            }
            Err(err) => self.show_error(&err)?,
        }

        Ok(None)
    }

    fn remove(&mut self, number: usize) -> io::Result<()> {
        match self.cart.remove_item(number - 1) {
            Ok(commit) => {
                self.warn_if_unsaved(&commit)?;
                let removed = commit.into_value();
                let remaining = self.config.format_currency(self.cart.remaining_budget());
                writeln!(
                    self.output,
                    "Removed {}. Remaining budget: {}",
                    removed.name, remaining
                )?;
            }
            Err(CartError::IndexOutOfRange { len, .. }) => {
                writeln!(
                    self.output,
                    "  ! There is no item #{}; the cart has {} item(s)",
                    number, len
                )?;
            }
            Err(err) => self.show_error(&err)?,
        }
        Ok(())
    }

    fn finalize(&mut self) -> io::Result<Option<ShellExit>> {
        let summary = match self.cart.finalize() {
            Ok(summary) => summary,
            Err(err) => {
                self.show_error(&err)?;
                return Ok(None);
            }
        };

        for line in render::summary_lines(&summary, &self.config) {
            writeln!(self.output, "{}", line)?;
        }
        writeln!(self.output, "Thank you for your purchase, {}!", summary.owner)?;
        info!(owner = %summary.owner, "Purchase completed");

        let commit = self.cart.reset();
        self.warn_if_unsaved(&commit)?;

        Ok(Some(ShellExit::Finalized))
    }

    // -------------------------------------------------------------------------
    // I/O helpers
    // -------------------------------------------------------------------------

    /// Writes `label`, reads one line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn show_cart(&mut self) -> io::Result<()> {
        for line in render::cart_lines(self.cart.items(), &self.config) {
            writeln!(self.output, "{}", line)?;
        }
        let totals = render::totals_line(&self.cart.totals(), &self.config);
        writeln!(self.output, "{}", totals)
    }

    fn show_error(&mut self, err: &CartError) -> io::Result<()> {
        for line in render::error_lines(err, &self.config) {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }

    fn warn_if_unsaved<T>(&mut self, commit: &Commit<T>) -> io::Result<()> {
        if let Err(err) = &commit.persistence {
            writeln!(
                self.output,
                "  warning: {}; changes are kept for this session only",
                err
            )?;
        }
        Ok(())
    }
}
