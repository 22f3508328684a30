use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    config::load_settings,
    error::ActionError,
    forms::{FormError, FormField, FormMode, PersonForm},
    query::{FilterState, NumericCondition, SortKey, SortSpec},
    PersonClient,
};
use shared::domain::{Color, Country, PersonId};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod output;

#[derive(Parser, Debug)]
#[command(name = "persons", about = "Browse and edit the Person collection")]
struct Cli {
    /// Person service base URL, overriding config and environment.
    #[arg(long, global = true)]
    person_service: Option<String>,
    /// Demography service base URL.
    #[arg(long, global = true)]
    demography_service: Option<String>,
    /// Settings file; `persons.toml` is read when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one page of the collection.
    List(ListArgs),
    Create(PersonArgs),
    /// Replace an existing Person.
    Update {
        id: i64,
        /// Send the location fields; without it the location is cleared.
        #[arg(long)]
        with_location: bool,
        #[command(flatten)]
        person: PersonArgs,
    },
    Delete {
        id: i64,
    },
    DeleteByHairColor {
        color: Color,
    },
    /// Person with the longest name.
    MaxName,
    NationalityLessThan {
        nationality: Country,
    },
    #[command(subcommand)]
    Demography(DemographyCommand),
}

#[derive(Subcommand, Debug)]
enum DemographyCommand {
    /// Share of persons with the given hair color.
    HairColor { color: Color },
    /// Persons of a nationality having the given eye color.
    NationalityEyeColor {
        nationality: Country,
        eye_color: Color,
    },
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long, default_value_t = 0)]
    page: u32,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    size: Option<u32>,
    /// Substring match on the name.
    #[arg(long)]
    name: Option<String>,
    /// Numeric criterion such as `height>=170` or `coordinates.x!=0`.
    #[arg(long = "filter")]
    filters: Vec<NumericCondition>,
    #[arg(long)]
    hair_color: Option<Color>,
    #[arg(long)]
    eye_color: Option<Color>,
    #[arg(long)]
    nationality: Option<Country>,
    #[arg(long)]
    location_name: Option<String>,
    /// Sort key, `-` prefix for descending. Repeat for secondary keys.
    #[arg(long = "sort", allow_hyphen_values = true)]
    sort: Vec<SortKey>,
}

impl ListArgs {
    fn filter_state(&self) -> FilterState {
        let mut state = FilterState {
            name_search: self.name.clone().unwrap_or_default(),
            hair_color: self.hair_color,
            eye_color: self.eye_color,
            nationality: self.nationality,
            location_name: self.location_name.clone().unwrap_or_default(),
            ..FilterState::default()
        };
        for condition in &self.filters {
            state.set_condition(condition.clone());
        }
        state
    }
}

/// Raw field input, validated by the form before anything is sent.
#[derive(Args, Debug)]
struct PersonArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    x: Option<String>,
    #[arg(long)]
    y: Option<String>,
    #[arg(long)]
    height: Option<String>,
    #[arg(long)]
    weight: Option<String>,
    #[arg(long)]
    hair_color: Option<String>,
    #[arg(long)]
    eye_color: Option<String>,
    #[arg(long)]
    nationality: Option<String>,
    #[arg(long)]
    location_name: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    location_x: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    location_y: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    location_z: Option<String>,
}

impl PersonArgs {
    fn into_form(self, mode: FormMode) -> PersonForm {
        let mut form = PersonForm::new(mode);
        let values = [
            (FormField::Name, self.name),
            (FormField::CoordinatesX, self.x),
            (FormField::CoordinatesY, self.y),
            (FormField::Height, self.height),
            (FormField::Weight, self.weight),
            (FormField::HairColor, self.hair_color),
            (FormField::EyeColor, self.eye_color),
            (FormField::Nationality, self.nationality),
            (FormField::LocationName, self.location_name),
            (FormField::LocationX, self.location_x),
            (FormField::LocationY, self.location_y),
            (FormField::LocationZ, self.location_z),
        ];
        for (field, value) in values {
            if let Some(value) = value {
                form.set(field, value);
            }
        }
        form
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Notifications are printed after the command; keep them out of the log.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,client_core::notify=off")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(url) = cli.person_service {
        settings.person_service_url = url;
    }
    if let Some(url) = cli.demography_service {
        settings.demography_service_url = url;
    }
    if let Command::List(ListArgs {
        size: Some(size), ..
    }) = &cli.command
    {
        settings.page_size = *size;
    }
    settings.validate().context("invalid service url")?;

    let client = PersonClient::new(settings).context("failed to build http client")?;
    let mut notifications = client.subscribe();

    let succeeded = run(&client, cli.command).await;
    output::print_notifications(&mut notifications);

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Runs one command. Failures are reported through notifications.
async fn run(client: &PersonClient, command: Command) -> bool {
    match command {
        Command::List(args) => {
            let sort = SortSpec::from_keys(args.sort.iter().copied());
            let mut list = client
                .list_controller()
                .with_view(args.filter_state().to_query(), sort);
            match list.go_to_page(args.page).await {
                Ok(_) => {
                    output::print_page(list.items(), list.meta());
                    true
                }
                Err(err) => {
                    debug!(error = %err, "list failed");
                    false
                }
            }
        }
        Command::Create(person) => {
            let mut form = person.into_form(FormMode::Create);
            let result = client.list_controller().create(&mut form).await;
            finish_action(result)
        }
        Command::Update {
            id,
            with_location,
            person,
        } => {
            let mut form = person.into_form(FormMode::Edit);
            form.set_location_enabled(with_location);
            let result = client
                .list_controller()
                .update(PersonId(id), &mut form)
                .await;
            finish_action(result)
        }
        Command::Delete { id } => client
            .list_controller()
            .delete(PersonId(id))
            .await
            .is_ok(),
        Command::DeleteByHairColor { color } => client
            .list_controller()
            .delete_by_hair_color(color)
            .await
            .is_ok(),
        Command::MaxName => match client.special_operations().max_name().await {
            Ok(person) => {
                output::print_page(std::slice::from_ref(&person), Default::default());
                true
            }
            Err(_) => false,
        },
        Command::NationalityLessThan { nationality } => {
            match client
                .special_operations()
                .nationality_less_than(nationality)
                .await
            {
                Ok(persons) => {
                    if !persons.is_empty() {
                        output::print_page(&persons, Default::default());
                    }
                    true
                }
                Err(_) => false,
            }
        }
        Command::Demography(DemographyCommand::HairColor { color }) => {
            match client.special_operations().hair_color_percentage(color).await {
                Ok(stats) => {
                    output::print_hair_color_stats(&stats);
                    true
                }
                Err(_) => false,
            }
        }
        Command::Demography(DemographyCommand::NationalityEyeColor {
            nationality,
            eye_color,
        }) => {
            match client
                .special_operations()
                .nationality_eye_color_count(nationality, eye_color)
                .await
            {
                Ok(stats) => {
                    output::print_eye_color_stats(&stats);
                    true
                }
                Err(_) => false,
            }
        }
    }
}

fn finish_action(result: Result<shared::domain::Person, ActionError>) -> bool {
    match result {
        Ok(person) => {
            output::print_page(std::slice::from_ref(&person), Default::default());
            true
        }
        Err(ActionError::Form(FormError::Invalid(errors))) => {
            output::print_field_errors(&errors);
            false
        }
        Err(ActionError::Client(err)) => {
            debug!(error = %err, "request failed");
            false
        }
    }
}
