//! Menu-driven command loop.
//!
//! Every command runs to completion against the store and reports its own
//! failures; nothing short of closed input or a broken output stream ends
//! the loop early.

use std::io::{BufRead, Write};

use anyhow::Result;
use rand::seq::IteratorRandom;
use tracing::{error, info, warn};

use umptrack_core::models::{parse_date, today, MileageReport};
use umptrack_core::utils::{format_fee, format_mileage};
use umptrack_core::{
    Database, DistanceLookup, DistanceResolver, Game, GameField, Season, TrackerError,
};

use crate::prompt::{is_input_closed, parse_id, parse_ids, Prompt};
use crate::table;

/// Width of the centered menu banners
const BANNER_WIDTH: usize = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainChoice {
    Add,
    Update,
    Remove,
    ViewUnpaid,
    Ledger,
    Summary,
    MarkPaid,
    Backfill,
    Recompute,
    Database,
    Exit,
}

impl MainChoice {
    fn from_token(token: &str) -> Option<Self> {
        let choice = match token.to_lowercase().as_str() {
            "a" => MainChoice::Add,
            "u" => MainChoice::Update,
            "r" => MainChoice::Remove,
            "v" => MainChoice::ViewUnpaid,
            "l" => MainChoice::Ledger,
            "s" => MainChoice::Summary,
            "p" => MainChoice::MarkPaid,
            "m" => MainChoice::Backfill,
            "c" => MainChoice::Recompute,
            "d" => MainChoice::Database,
            "x" => MainChoice::Exit,
            _ => return None,
        };
        Some(choice)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DbChoice {
    Back,
    Drop,
    CreateGames,
    CreateReferences,
    Rebuild,
    PopulateSites,
}

impl DbChoice {
    fn from_token(token: &str) -> Option<Self> {
        let choice = match token.to_lowercase().as_str() {
            "x" => DbChoice::Back,
            "d" => DbChoice::Drop,
            "c" => DbChoice::CreateGames,
            "m" => DbChoice::CreateReferences,
            "re" => DbChoice::Rebuild,
            "p" => DbChoice::PopulateSites,
            _ => return None,
        };
        Some(choice)
    }

    fn is_destructive(self) -> bool {
        matches!(self, DbChoice::Drop | DbChoice::Rebuild)
    }
}

const MAIN_MENU: [&str; 11] = [
    "[A]dd Game",
    "[U]pdate Game",
    "[R]emove Game",
    "[V]iew Unpaid Games",
    "[L]edger",
    "[S]eason Summary",
    "Mark Games [P]aid",
    "[M]ileage Backfill",
    "re[C]ompute Fee/Assignor",
    "[D]atabase Ops",
    "E[x]it",
];

const DB_MENU: [&str; 6] = [
    "E[x]it to Main Menu",
    "[D]rop tables",
    "[C]reate games table",
    "[M]ake reference tables",
    "[RE]build database",
    "[P]opulate site mileage",
];

pub struct Shell<R, W, L> {
    prompt: Prompt<R, W>,
    db: Database,
    resolver: DistanceResolver<L>,
}

impl<R: BufRead, W: Write, L: DistanceLookup> Shell<R, W, L> {
    pub fn new(input: R, output: W, db: Database, resolver: DistanceResolver<L>) -> Self {
        Self {
            prompt: Prompt::new(input, output),
            db,
            resolver,
        }
    }

    /// Run the main menu until the user exits or input runs out.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu(" Umpiring Revenue and Travel Tracker ", &MAIN_MENU)?;
            let Some(token) = self.prompt.read_line("Enter your choice: ")? else {
                break;
            };

            let Some(choice) = MainChoice::from_token(&token) else {
                writeln!(self.prompt.out(), "Invalid choice. Please try again.")?;
                continue;
            };
            if choice == MainChoice::Exit {
                writeln!(self.prompt.out(), "Exiting the application.")?;
                break;
            }

            let result = match choice {
                MainChoice::Add => self.add_game().await,
                MainChoice::Update => self.update_game(),
                MainChoice::Remove => self.remove_game(),
                MainChoice::ViewUnpaid => self.view_unpaid(),
                MainChoice::Ledger => self.view_ledger(),
                MainChoice::Summary => self.view_summary(),
                MainChoice::MarkPaid => self.mark_paid(),
                MainChoice::Backfill => self.backfill().await,
                MainChoice::Recompute => self.recompute(),
                MainChoice::Database => self.database_menu().await,
                MainChoice::Exit => Ok(()),
            };

            if let Err(e) = result {
                if is_input_closed(&e) {
                    break;
                }
                self.report(&e)?;
            }
        }

        info!("Shell finished");
        Ok(())
    }

    fn print_menu(&mut self, title: &str, entries: &[&str]) -> Result<()> {
        let out = self.prompt.out();
        writeln!(out)?;
        writeln!(out, "{:*^width$}", title, width = BANNER_WIDTH)?;
        for entry in entries {
            writeln!(out, "{}", entry)?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// Print a failed command's error and log it at a level matching its kind.
    fn report(&mut self, err: &anyhow::Error) -> Result<()> {
        match err.downcast_ref::<TrackerError>() {
            Some(e) if !e.is_validation() => error!(error = %e, "Command failed"),
            _ => warn!(error = %err, "Command rejected"),
        }
        writeln!(self.prompt.out(), "Error: {}", err)?;
        Ok(())
    }

    // ===== Games =====

    async fn add_game(&mut self) -> Result<()> {
        let references = self.resolver.references();

        let site = self.prompt.ask("Site (blank for random): ")?;
        let site = if site.is_empty() {
            references
                .sites
                .names()
                .choose(&mut rand::thread_rng())
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("No sites are configured"))?
        } else {
            site
        };
        if !references.sites.contains(&site) {
            return Err(TrackerError::UnknownSite(site).into());
        }

        let league = self.prompt.ask("League (blank for random): ")?;
        let league = if league.is_empty() {
            references
                .leagues
                .names()
                .choose(&mut rand::thread_rng())
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("No leagues are configured"))?
        } else {
            league
        };
        if !references.leagues.contains(&league) {
            return Err(TrackerError::UnknownLeague(league).into());
        }

        let date = self.prompt.ask("Date YYYY-MM-DD (blank for today): ")?;
        let date = if date.is_empty() {
            today()
        } else {
            parse_date(&date)?
        };

        let game = Game::create(&site, &league, Some(date), &self.resolver).await;
        let id = self.db.add_game(self.resolver.references(), &game)?;
        writeln!(
            self.prompt.out(),
            "Added game {}: {} at {} ({}), {} from {}, {} mi",
            id,
            game.date,
            game.site,
            game.league,
            format_fee(game.game_fee),
            game.assignor,
            format_mileage(game.mileage)
        )?;
        Ok(())
    }

    fn update_game(&mut self) -> Result<()> {
        let id = parse_id(&self.prompt.ask("Enter the ID of the game to update: ")?)?;
        if self.db.get_game(id)?.is_none() {
            return Err(TrackerError::GameNotFound(id).into());
        }

        writeln!(self.prompt.out(), "Which field would you like to update?")?;
        for field in GameField::ALL {
            writeln!(self.prompt.out(), "{}", field.menu_label())?;
        }
        let field = GameField::from_token(&self.prompt.ask("Enter the field: ")?)?;
        let raw = self
            .prompt
            .ask(&format!("Enter the new value for {}: ", field.column()))?;
        let value = field.parse(&raw)?;

        self.db
            .update_field(self.resolver.references(), id, &value)?;
        writeln!(self.prompt.out(), "Game with ID {} has been updated.", id)?;
        Ok(())
    }

    fn remove_game(&mut self) -> Result<()> {
        let id = parse_id(&self.prompt.ask("Enter Game ID to remove: ")?)?;
        if !self.prompt.confirm(&format!("Remove game {}? ", id))? {
            writeln!(self.prompt.out(), "Operation canceled.")?;
            return Ok(());
        }
        if !self.db.delete_game(id)? {
            return Err(TrackerError::GameNotFound(id).into());
        }
        writeln!(self.prompt.out(), "Game with ID {} has been removed.", id)?;
        Ok(())
    }

    fn recompute(&mut self) -> Result<()> {
        let id = parse_id(&self.prompt.ask("Enter the ID of the game to recompute: ")?)?;
        let game = self
            .db
            .recompute_derived(&self.resolver.references().leagues, id)?;
        writeln!(
            self.prompt.out(),
            "Game {} ({}) now pays {} from {}.",
            id,
            game.league,
            format_fee(game.game_fee),
            game.assignor
        )?;
        Ok(())
    }

    // ===== Views =====

    fn view_unpaid(&mut self) -> Result<()> {
        let rows = self.db.unpaid_ledger(Some(Season::current()))?;
        if rows.is_empty() {
            writeln!(self.prompt.out(), "No unpaid games found.")?;
        } else {
            writeln!(self.prompt.out(), "{}", table::unpaid_games(&rows))?;
        }
        Ok(())
    }

    fn view_ledger(&mut self) -> Result<()> {
        let rows = self.db.full_ledger(Some(Season::current()))?;
        if rows.is_empty() {
            writeln!(self.prompt.out(), "No games found.")?;
        } else {
            writeln!(self.prompt.out(), "{}", table::master_ledger(&rows))?;
        }
        Ok(())
    }

    fn view_summary(&mut self) -> Result<()> {
        let season = Season::current();
        let rows = self.db.season_summary(Some(season))?;
        if rows.is_empty() {
            writeln!(self.prompt.out(), "No games found for the {} season.", season)?;
        } else {
            let title = format!("{} Season Summary", season);
            writeln!(self.prompt.out(), "{}", table::season_summary(&title, &rows))?;
        }
        Ok(())
    }

    // ===== Payment and mileage =====

    fn mark_paid(&mut self) -> Result<()> {
        let unpaid = self.db.fetch_unpaid_ids()?;
        if unpaid.is_empty() {
            writeln!(self.prompt.out(), "There are no unpaid games to update.")?;
            return Ok(());
        }

        let listed: Vec<String> = unpaid.iter().map(i64::to_string).collect();
        writeln!(self.prompt.out(), "Unpaid game IDs: {}", listed.join(", "))?;
        let ids = parse_ids(
            &self
                .prompt
                .ask("Enter game IDs to mark as paid (comma-separated): ")?,
        )?;
        self.db.validate_unpaid(&ids)?;

        if !self.prompt.confirm("Confirm mark as paid? ")? {
            writeln!(self.prompt.out(), "Operation canceled.")?;
            return Ok(());
        }
        let changed = self.db.mark_unpaid_paid(&ids)?;
        writeln!(self.prompt.out(), "{} game(s) marked as paid.", changed)?;
        Ok(())
    }

    async fn backfill(&mut self) -> Result<()> {
        let report = self.resolver.backfill().await?;
        self.print_mileage_report(&report)
    }

    fn print_mileage_report(&mut self, report: &MileageReport) -> Result<()> {
        let out = self.prompt.out();
        if report.is_empty() {
            writeln!(out, "No sites needed a mileage update.")?;
            return Ok(());
        }
        for (site, mileage) in &report.updated {
            writeln!(out, "{}: {} mi", site, format_mileage(*mileage))?;
        }
        for site in &report.skipped {
            writeln!(out, "{}: distance unavailable", site)?;
        }
        Ok(())
    }

    // ===== Database operations =====

    async fn database_menu(&mut self) -> Result<()> {
        loop {
            self.print_menu(" Database Operations ", &DB_MENU)?;
            let token = self.prompt.ask("Enter your choice: ")?;
            let Some(choice) = DbChoice::from_token(&token) else {
                writeln!(self.prompt.out(), "Invalid choice. Please try again.")?;
                continue;
            };
            if choice == DbChoice::Back {
                return Ok(());
            }
            if choice.is_destructive() && !self.prompt.confirm("Are you sure?? ")? {
                writeln!(self.prompt.out(), "Operation canceled.")?;
                continue;
            }

            let result: Result<()> = match choice {
                DbChoice::Drop => self.db.drop_tables().map_err(Into::into),
                DbChoice::CreateGames => self.db.create_games_table().map_err(Into::into),
                DbChoice::CreateReferences => {
                    self.db.create_reference_tables().map_err(Into::into)
                }
                DbChoice::Rebuild => self.db.rebuild().map_err(Into::into),
                DbChoice::PopulateSites => {
                    let report = self.resolver.populate_sites().await;
                    self.print_mileage_report(&report)
                }
                DbChoice::Back => Ok(()),
            };

            match result {
                Ok(()) => writeln!(self.prompt.out(), "Done.")?,
                Err(e) => self.report(&e)?,
            }
        }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.prompt.into_output()
    }
}
