//! `/roll`: dice expressions such as `2d6+3` or `d20 - 1`
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use rand::Rng;
use regex::Regex;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::autocomplete::AutocompleteInteraction;

use crate::commands::context::CommandContext;
use crate::commands::definition::{create_command, Command, SlashCommand};
use crate::commands::handler::{AutocompleteChoice, AutocompleteHandler, Handler, HandlerParams};
use crate::commands::reply::CommandReply;
use crate::commands::slash::{focused_option_value, get_string_option};

pub const DICE_OPTION: &str = "dice";

const MAX_DICE: u32 = 100;
const MAX_SIDES: u32 = 1000;
const MAX_TERMS: usize = 20;
/// Discord accepts at most 25 autocomplete choices
const MAX_CHOICES: usize = 25;

const COMMON_ROLLS: &[&str] = &[
    "d20", "d4", "d6", "d8", "d10", "d12", "d100", "2d6", "3d6", "4d6", "2d20", "d20+5",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiceTerm {
    Dice { count: u32, sides: u32 },
    Flat(u32),
}

/// A term with the sign it is applied with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedTerm {
    pub negative: bool,
    pub term: DiceTerm,
}

pub fn command() -> Command {
    create_command(
        "Rolls some dice using the Roll20 dice specification as input.",
        SlashCommand::new(RollDice)
            .describe_with(|cmd, _| {
                cmd.create_option(|option| {
                    option
                        .name(DICE_OPTION)
                        .description("dice string")
                        .kind(CommandOptionType::String)
                        .required(true)
                        .set_autocomplete(true)
                });
            })
            .autocomplete(SuggestRolls),
    )
}

pub struct RollDice;

#[async_trait]
impl Handler<ApplicationCommandInteraction> for RollDice {
    async fn handle(
        &self,
        params: HandlerParams<'_, ApplicationCommandInteraction>,
    ) -> Result<CommandReply> {
        let dice = get_string_option(&params.interaction.data.options, DICE_OPTION)
            .context("the dice option is required")?;
        let total = roll(&dice)?;
        Ok(format!("You cast your `{dice}` dice and rolled `{total}`").into())
    }
}

pub struct SuggestRolls;

#[async_trait]
impl AutocompleteHandler for SuggestRolls {
    async fn complete(
        &self,
        _context: &CommandContext,
        interaction: &AutocompleteInteraction,
    ) -> Result<Vec<AutocompleteChoice>> {
        let typed = focused_option_value(&interaction.data.options).unwrap_or_default();
        Ok(suggest(&typed))
    }
}

/// Parse and roll an expression with the thread-local generator
pub fn roll(expression: &str) -> Result<i64> {
    let terms = parse_dice(expression)?;
    Ok(roll_terms(&terms, &mut rand::rng()))
}

/// Parse `NdM`, `dM` and flat modifiers joined by `+` or `-`
pub fn parse_dice(expression: &str) -> Result<Vec<SignedTerm>> {
    let compact: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
    let shape = Regex::new(r"^[+-]?(\d*[dD]\d+|\d+)([+-](\d*[dD]\d+|\d+))*$")?;
    if compact.is_empty() || !shape.is_match(&compact) {
        bail!("`{expression}` is not a dice expression, try something like `2d6+3`");
    }

    let term = Regex::new(r"([+-]?)(?:(\d*)[dD](\d+)|(\d+))")?;
    let mut terms = Vec::new();
    for captures in term.captures_iter(&compact) {
        let negative = &captures[1] == "-";
        let parsed = match (captures.get(3), captures.get(4)) {
            (Some(sides), _) => {
                let count = match captures.get(2).map(|m| m.as_str()) {
                    None | Some("") => 1,
                    Some(count) => parse_number(count)?,
                };
                let sides = parse_number(sides.as_str())?;
                if count == 0 || count > MAX_DICE {
                    bail!("You can roll between 1 and {MAX_DICE} dice at a time");
                }
                if sides == 0 || sides > MAX_SIDES {
                    bail!("Dice need between 1 and {MAX_SIDES} sides");
                }
                DiceTerm::Dice { count, sides }
            }
            (None, Some(flat)) => DiceTerm::Flat(parse_number(flat.as_str())?),
            (None, None) => continue,
        };
        terms.push(SignedTerm {
            negative,
            term: parsed,
        });
    }

    if terms.len() > MAX_TERMS {
        bail!("Too many terms, at most {MAX_TERMS} are allowed");
    }
    Ok(terms)
}

fn parse_number(digits: &str) -> Result<u32> {
    digits
        .parse()
        .with_context(|| format!("`{digits}` is too large"))
}

pub fn roll_terms<R: Rng + ?Sized>(terms: &[SignedTerm], rng: &mut R) -> i64 {
    terms
        .iter()
        .map(|signed| {
            let value: i64 = match signed.term {
                DiceTerm::Dice { count, sides } => (0..count)
                    .map(|_| i64::from(rng.random_range(1..=sides)))
                    .sum(),
                DiceTerm::Flat(value) => i64::from(value),
            };
            if signed.negative {
                -value
            } else {
                value
            }
        })
        .sum()
}

/// Common rolls starting with what was typed, led by the typed text when it parses
pub fn suggest(typed: &str) -> Vec<AutocompleteChoice> {
    let typed = typed.trim().to_lowercase();
    let mut choices = Vec::new();
    if !typed.is_empty() && parse_dice(&typed).is_ok() {
        choices.push(AutocompleteChoice::new(typed.clone(), typed.clone()));
    }
    choices.extend(
        COMMON_ROLLS
            .iter()
            .filter(|roll| roll.starts_with(&typed) && **roll != typed)
            .map(|roll| AutocompleteChoice::new(*roll, *roll)),
    );
    choices.truncate(MAX_CHOICES);
    choices
}
