// src/main.rs
//
// Calculatrice flottante : point d’entrée en ligne de commande
// ------------------------------------------------------------
// Usage:
//   calculatrice "((2 + 3)! - 1) / 2 ^ 2"       -> 29.75
//   echo '{"num1":"2","operator":"sqrt"}' | calculatrice --json
//
// - Arguments présents : ils sont joints par des espaces, une seule évaluation.
// - Sinon : stdin ligne par ligne (ligne « { ... » = requête JSON, sinon expression).
// - Code de sortie : 0 si tout a réussi, 1 sinon, 2 si les réglages sont invalides.

use std::io::{self, BufRead};
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use calculatrice_flottante::app::{rendre, rendre_jetons, traiter, Rendu, Reponse, Requete};
use calculatrice_flottante::noyau::reglages::{ErreurReglages, PRECISION_DEFAUT};
use calculatrice_flottante::noyau::Reglages;

#[derive(Parser, Debug)]
#[command(name = "calculatrice")]
#[command(version, about = "Évaluateur d’expressions en précision arbitraire", long_about = None)]
struct Cli {
    /// Expression à évaluer (sinon lecture sur stdin)
    #[arg(value_name = "EXPRESSION")]
    expression: Vec<String>,

    /// Réponses en JSON, une par ligne
    #[arg(long)]
    json: bool,

    /// Affiche aussi le flux de jetons
    #[arg(long)]
    jetons: bool,

    /// Précision de travail en bits (64..=4096)
    #[arg(long, default_value_t = PRECISION_DEFAUT)]
    precision: u64,

    /// Plus grand n accepté par n!
    #[arg(long, value_name = "N")]
    factorielle_max: Option<u64>,

    /// Plus grand |n| accepté par x ^ n
    #[arg(long, value_name = "N")]
    exposant_max: Option<u64>,

    /// Chiffres après la virgule avant compactage
    #[arg(long, value_name = "N")]
    decimales: Option<usize>,

    /// Verbosité des journaux (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logs(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    let niveau = match verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };
    if let Some(n) = niveau {
        builder.filter_level(n);
    }
    builder.init();
}

fn construire_reglages(cli: &Cli) -> Result<Reglages, ErreurReglages> {
    let mut reglages = Reglages::default().avec_precision(cli.precision)?;
    if let Some(n) = cli.factorielle_max {
        reglages = reglages.avec_factorielle_max(n);
    }
    if let Some(n) = cli.exposant_max {
        reglages = reglages.avec_exposant_max(n);
    }
    if let Some(n) = cli.decimales {
        reglages = reglages.avec_decimales(n);
    }
    Ok(reglages)
}

/// Traite une requête, affiche la réponse ; renvoie true en cas de succès.
fn executer(requete: &Requete, reglages: &Reglages, cli: &Cli) -> bool {
    if cli.jetons {
        if let Requete::Expression { expression } = requete {
            println!("{}", rendre_jetons(expression));
        }
    }
    afficher(&traiter(requete, reglages), cli)
}

fn afficher(reponse: &Reponse, cli: &Cli) -> bool {
    let rendu = if cli.json { Rendu::Json } else { Rendu::Texte };
    match rendre(reponse, rendu) {
        Ok(ligne) => {
            println!("{ligne}");
            reponse.est_succes()
        }
        Err(e) => {
            log::error!("rendu impossible: {e}");
            false
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logs(cli.verbose);

    let reglages = match construire_reglages(&cli) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };
    log::info!(
        "précision {} bits, {} décimales",
        reglages.precision(),
        reglages.decimales()
    );

    let mut tout_ok = true;

    if !cli.expression.is_empty() {
        let requete = Requete::expression(cli.expression.join(" "));
        tout_ok = executer(&requete, &reglages, &cli);
    } else {
        for ligne in io::stdin().lock().lines() {
            let ligne = match ligne {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::FAILURE;
                }
            };
            let ligne = ligne.trim_end_matches('\r');
            if ligne.trim().is_empty() {
                continue;
            }

            let ok = match Requete::depuis_ligne(ligne) {
                Ok(requete) => executer(&requete, &reglages, &cli),
                Err(e) => afficher(&Reponse::requete_invalide(&e), &cli),
            };
            tout_ok &= ok;
        }
    }

    if tout_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
