//! Cuadro terminal chat. Runs onboarding on first launch, then loops
//! reading messages from stdin and printing the assistant replies.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::info;
use tracing_subscriber::EnvFilter;

use cuadro_backend::domain::{BudgetService, ChatService};
use cuadro_backend::nlu::amount::normalize_amount;
use cuadro_backend::nlu::openai::OpenAiClassifier;
use cuadro_backend::CsvConnection;
use shared::{OnboardingFixedExpense, OnboardingRequest};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let data_dir = data_directory()?;
    info!("Using data directory {:?}", data_dir);
    let connection = Arc::new(CsvConnection::new(&data_dir)?);
    let budget_service = BudgetService::new(connection);

    if !budget_service.profile_or_default()?.onboarding_complete {
        run_onboarding(&budget_service)?;
    }

    let classifier = OpenAiClassifier::from_env();
    let mut chat = ChatService::new(Box::new(classifier), budget_service);

    println!("{}\n", chat.welcome());

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message.eq_ignore_ascii_case("salir") {
            break;
        }

        let reply = chat.handle_message(message).await;
        println!("\n{}\n", reply);
    }

    println!("¡Nos vemos!");
    Ok(())
}

/// CUADRO_DATA_DIR wins; otherwise the platform data directory
fn data_directory() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CUADRO_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|d| d.join("cuadro"))
        .ok_or_else(|| anyhow!("Could not determine a data directory"))
}

/// First-launch questionnaire: income, savings target and fixed expenses
fn run_onboarding(budget_service: &BudgetService<CsvConnection>) -> Result<()> {
    println!("¡Bienvenido a Cuadro! Primero cuadremos tus números.\n");

    let income = prompt_amount("¿Cuánto te entra al mes? (ej: 2 palos, 2500000)")?;
    let savings_target = prompt_amount("¿Cuánto quieres ahorrar al mes? (0 si nada)")?;

    println!("\nAhora tus gastos fijos (arriendo, servicios, suscripciones).");
    println!("Escribe uno por línea como \"Arriendo 500000\"; línea vacía para terminar.\n");

    let mut fixed_expenses = Vec::new();
    let stdin = io::stdin();
    loop {
        print!("gasto fijo> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        match parse_fixed_expense(line) {
            Some(expense) => fixed_expenses.push(expense),
            None => println!("No entendí ese. Ejemplo: \"Internet 90000\""),
        }
    }

    budget_service.complete_onboarding(OnboardingRequest {
        income,
        savings_target,
        fixed_expenses,
    })?;
    println!("\n¡Listo, quedamos cuadrados!\n");
    Ok(())
}

fn prompt_amount(question: &str) -> Result<u64> {
    let stdin = io::stdin();
    loop {
        println!("{}", question);
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(anyhow!("Input closed during onboarding"));
        }
        let answer = line.trim();
        if answer == "0" {
            return Ok(0);
        }
        match normalize_amount(answer) {
            Some(amount) => return Ok(amount),
            None => println!("No entendí esa cifra, intenta de nuevo (ej: 500k, 2 palos)."),
        }
    }
}

/// "Arriendo 500000" -> name + amount; the amount accepts the same
/// shorthand as chat messages ("500k")
fn parse_fixed_expense(line: &str) -> Option<OnboardingFixedExpense> {
    let (name, amount_part) = line.rsplit_once(' ')?;
    let amount = normalize_amount(amount_part)?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(OnboardingFixedExpense {
        name: name.to_string(),
        parent_category: None,
        amount,
    })
}
