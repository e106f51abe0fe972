use clap::{Args, Parser, Subcommand};
use pms_core::{
    activity_capacity_from_env_value, constants::DEFAULT_PATIENT_DATA_DIR, CoreConfig, Patient,
    PatientFields, PatientManager,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pms")]
#[command(about = "Patient management system CLI")]
struct Cli {
    /// Directory holding patients.json (defaults to $PATIENT_DATA_DIR, then ./patient_data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients, most recently added first
    List,
    /// List all patients in ascending id order
    Sorted,
    /// Show one patient
    Show {
        /// Patient id
        id: u32,
    },
    /// Register a new patient
    Add {
        /// Use this id instead of the next free one
        #[arg(long)]
        id: Option<u32>,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Replace every field of an existing patient
    Update {
        /// Patient id
        id: u32,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a patient
    Delete {
        /// Patient id
        id: u32,
    },
    /// Search patients by part of their name
    Search {
        /// Case-insensitive name fragment
        query: String,
    },
    /// Load the five demonstration patients
    Sample,
    /// Delete every patient and the saved snapshot
    Clear,
    /// Print statistics as JSON
    Stats,
    /// Print (or write) the export document
    Export {
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct FieldArgs {
    /// Full name (at least 2 characters)
    name: String,
    /// Age in years (0-150)
    #[arg(allow_negative_numbers = true)]
    age: i64,
    /// Gender
    gender: String,
    /// Disease or condition
    disease: String,
    /// Contact number
    #[arg(long, default_value = "")]
    contact: String,
    /// Appointment date (free text, e.g. 2024-01-15)
    #[arg(long, default_value = "")]
    date: String,
    /// Visit notes
    #[arg(long, default_value = "")]
    notes: String,
}

impl From<FieldArgs> for PatientFields {
    fn from(args: FieldArgs) -> Self {
        PatientFields {
            name: args.name,
            age: args.age,
            gender: args.gender,
            disease: args.disease,
            contact_number: args.contact,
            appointment_date: args.date,
            visit_notes: args.notes,
        }
    }
}

fn print_patient(patient: &Patient) {
    println!(
        "ID: {}, Name: {}, Age: {}, Gender: {}, Condition: {}, Contact: {}, Appointment: {}, Notes: {}",
        patient.patient_id(),
        patient.name(),
        patient.age(),
        patient.gender(),
        patient.disease(),
        patient.contact_number(),
        patient.appointment_date(),
        patient.visit_notes()
    );
}

fn print_patients(patients: &[Patient]) {
    if patients.is_empty() {
        println!("No patients found.");
    } else {
        for patient in patients {
            print_patient(patient);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("pms_core=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'pms --help' for commands");
        return Ok(());
    };

    let data_dir = cli.data_dir.unwrap_or_else(|| {
        std::env::var("PATIENT_DATA_DIR")
            .unwrap_or_else(|_| DEFAULT_PATIENT_DATA_DIR.into())
            .into()
    });
    let activity_capacity =
        activity_capacity_from_env_value(std::env::var("PMS_ACTIVITY_CAPACITY").ok())?;
    let cfg = CoreConfig::new(data_dir, activity_capacity)?;
    let mut manager = PatientManager::open(&cfg);

    match command {
        Commands::List => print_patients(&manager.list_all()),
        Commands::Sorted => print_patients(&manager.list_sorted()),
        Commands::Show { id } => match manager.search_by_id(id) {
            Ok(patient) => print_patient(&patient),
            Err(e) => eprintln!("Error: {}", e),
        },
        Commands::Add { id, fields } => {
            let result = match id {
                Some(id) => manager.add_patient_with_id(id, fields.into()),
                None => manager.add_patient(fields.into()),
            };
            match result {
                Ok(patient) => println!(
                    "Added patient {} with ID: {}",
                    patient.name(),
                    patient.patient_id()
                ),
                Err(e) => eprintln!("Error adding patient: {}", e),
            }
        }
        Commands::Update { id, fields } => match manager.update_by_id(id, fields.into()) {
            Ok(patient) => println!("Updated patient ID: {}", patient.patient_id()),
            Err(e) => eprintln!("Error updating patient: {}", e),
        },
        Commands::Delete { id } => match manager.delete_by_id(id) {
            Ok(patient) => println!("Patient {} deleted successfully", patient.name()),
            Err(e) => eprintln!("Error deleting patient: {}", e),
        },
        Commands::Search { query } => print_patients(&manager.search_by_name(&query)),
        Commands::Sample => match manager.load_sample_data() {
            Ok(count) => println!("Loaded {} sample patients", count),
            Err(e) => eprintln!("Error loading sample data: {}", e),
        },
        Commands::Clear => {
            manager.clear_all();
            println!("All data cleared successfully");
        }
        Commands::Stats => {
            println!("{}", serde_json::to_string_pretty(&manager.statistics())?);
        }
        Commands::Export { output } => {
            let json = serde_json::to_string_pretty(&manager.export_snapshot())?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}
