//! Tests scientifiques (campagne) : propriétés observables du noyau.
//!
//! But : figer le contrat externe (valeurs, messages, précédence), via les deux entrées.
//! - arithmétique entière exacte (proptest contre i128)
//! - précédence / associativité, y compris puissance + factorielle
//! - politique numérique : division par zéro, √ négative, factorielle hors domaine
//! - formatage stable (idempotent)
//! - concurrence : évaluations indépendantes sur plusieurs threads

use std::time::{Duration, Instant};

use proptest::prelude::*;

use super::format::compacter;
use super::{calculer, eval_expression, formater, Categorie, ErreurCalcul, Reglages};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn eval_ok(expr: &str) -> String {
    let r = Reglages::default();
    let v = eval_expression(expr, &r).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"));
    formater(&v, &r)
}

fn eval_err(expr: &str) -> ErreurCalcul {
    match eval_expression(expr, &Reglages::default()) {
        Ok(v) => panic!("expr={expr:?} devait échouer, a donné {v:?}"),
        Err(e) => e,
    }
}

fn assert_err_contient(expr: &str, attendu: &str) {
    let e = eval_err(expr);
    assert!(
        e.to_string().contains(attendu),
        "expr={expr:?} : {:?} ne contient pas {attendu:?}",
        e.to_string()
    );
}

fn calc_ok(a: &str, b: Option<&str>, op: &str) -> String {
    let r = Reglages::default();
    let v = calculer(a, b, op, &r).unwrap_or_else(|e| panic!("{a} {op} {b:?} err={e}"));
    formater(&v, &r)
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Arithmétique entière ------------------------ */

#[test]
fn sci_entiers_simples() {
    assert_eq!(eval_ok("2 + 3"), "5");
    assert_eq!(eval_ok("10 - 4"), "6");
    assert_eq!(eval_ok("6 * 7"), "42");
    assert_eq!(eval_ok("2 ^ 3"), "8");
    assert_eq!(eval_ok("-5"), "-5");
}

proptest! {
    #[test]
    fn sci_entiers_exacts(a in -1_000_000_000i64..1_000_000_000, b in -1_000_000_000i64..1_000_000_000, op in 0usize..3) {
        let (sym, attendu) = match op {
            0 => ("+", a as i128 + b as i128),
            1 => ("-", a as i128 - b as i128),
            _ => ("*", a as i128 * b as i128),
        };
        // b négatif => parenthèses (le moins unaire reste valide, mais on garde le texte lisible)
        let expr = format!("{a} {sym} ({b})");
        prop_assert_eq!(eval_ok(&expr), attendu.to_string());

        let structure = calc_ok(&a.to_string(), Some(&b.to_string()), sym);
        prop_assert_eq!(structure, attendu.to_string());
    }
}

/* ------------------------ Précédence / associativité ------------------------ */

#[test]
fn sci_precedence() {
    let table = [
        ("6 * 7 / 3", "14"),
        ("2 + 3 * 4", "14"),
        ("(2 + 3) * 4", "20"),
        ("2 * 3 + 4 * 5", "26"),
        ("100 / 10 / 5", "2"),
        ("2 - 3 - 4", "-5"),
        ("2 ^ 3 ^ 2", "512"),
        ("(2 ^ 3) ^ 2", "64"),
        ("2 ^ 3!", "64"),
        ("2 * 3!", "12"),
        ("-2 ^ 2", "4"),
        ("-(2 ^ 2)", "-4"),
        ("1.5 + 2.5", "4"),
        ("((2 + 3)! - 1) / 2 ^ 2", "29.75"),
    ];
    for (expr, attendu) in table {
        assert_eq!(eval_ok(expr), attendu, "expr={expr:?}");
    }
}

/* ------------------------ Factorielle ------------------------ */

#[test]
fn sci_factorielle() {
    assert_eq!(eval_ok("5!"), "120");
    assert_eq!(eval_ok("0!"), "1");
    assert_err_contient("3.5!", "factorial of non-integer number is not defined");
    assert_err_contient("(-3)!", "factorial of negative number is not defined");
    assert_err_contient("501!", "factorial input too large");
    // 5!! = 120! : dans la borne
    assert!(eval_expression("5!!", &Reglages::default()).is_ok());
    // 6!! = 720! : hors borne
    assert_err_contient("6!!", "factorial input too large: 720");
    // opérande géant : message court, sans recopier le nombre
    assert_eq!(eval_err("(10^10000)!").to_string(), "factorial input too large");
}

/* ------------------------ Racine carrée ------------------------ */

#[test]
fn sci_racine() {
    assert_eq!(eval_ok("sqrt(25)"), "5");
    assert_eq!(eval_ok("sqrt(2)"), "1.414214");
    assert_eq!(eval_ok("sqrt(0)"), "0");
    assert_eq!(eval_ok("sqrt(2) * sqrt(2)"), "2");
    assert_eq!(eval_ok("sqrt(sqrt(16))"), "2");
    assert_err_contient("sqrt(-1)", "square root of negative number is not defined");
    assert_err_contient("sqrt(0 - 9)", "square root of negative number is not defined");
    assert_eq!(eval_err("sqrt(-1)").categorie(), Categorie::Domaine);
}

/* ------------------------ Division par zéro ------------------------ */

#[test]
fn sci_division_par_zero() {
    for expr in ["10 / 0", "1 / (2 - 2)", "5 * 3 / 0 * 2", "0 / 0", "2 ^ -1 / 0"] {
        let e = eval_err(expr);
        assert_eq!(e.to_string(), "division by zero", "expr={expr:?}");
        assert_eq!(e.categorie(), Categorie::Domaine);
    }
    assert_eq!(
        calculer("10", Some("0"), "/", &Reglages::default())
            .unwrap_err()
            .to_string(),
        "division by zero"
    );
}

/* ------------------------ Puissance ------------------------ */

#[test]
fn sci_puissance() {
    assert_eq!(eval_ok("2 ^ -2"), "0.25");
    assert_eq!(eval_ok("10 ^ 0"), "1");
    assert_eq!(eval_ok("(-2) ^ 3"), "-8");
    assert_err_contient("2 ^ 1.5", "unexpected expression");
    assert_err_contient("2 ^ 1.5", "non-integer exponent not supported");
    assert_err_contient("2 ^ 20000", "exponent too large");
    assert_err_contient("0 ^ -1", "division by zero");
}

/* ------------------------ Entrées mal formées ------------------------ */

#[test]
fn sci_mal_formees() {
    assert_err_contient("(2 + 3", "expecting closing parenthesis");
    assert_err_contient("2 + 3)", "unexpected token");
    assert_err_contient("2 + @", "invalid character");
    assert_err_contient("2 + 3 4", "expecting end of expression");
    assert_err_contient("", "unexpected token");
    assert_err_contient("   ", "unexpected token");

    assert_eq!(eval_err("2 + @").categorie(), Categorie::Lexicale);
    assert_eq!(eval_err("(2 + 3").categorie(), Categorie::Syntaxe);
    assert_eq!(eval_err("2 + 3 4").categorie(), Categorie::Syntaxe);
}

/* ------------------------ Entrée structurée ------------------------ */

#[test]
fn sci_structure() {
    assert_eq!(calc_ok("-10", Some("25"), "+"), "15");
    assert_eq!(calc_ok("-5", Some("6"), "*"), "-30");
    assert_eq!(calc_ok("2", Some("10"), "^"), "1024");
    assert_eq!(calc_ok("2", None, "sqrt"), "1.414214");
}

#[test]
fn sci_deux_entrees_coherentes() {
    for (a, b, op) in [("7", "3", "+"), ("7", "3", "-"), ("7", "3", "*"), ("2", "8", "^"), ("9", "4", "/")] {
        let expr = format!("{a} {op} {b}");
        assert_eq!(eval_ok(&expr), calc_ok(a, Some(b), op), "expr={expr:?}");
    }
}

/* ------------------------ Formatage ------------------------ */

#[test]
fn sci_formatage_idempotent() {
    for expr in ["42", "1 / 3", "12.34", "-7.5", "2 ^ 40"] {
        let s = eval_ok(expr);
        assert_eq!(compacter(&s), s, "expr={expr:?}");
        // ré-évaluer le texte produit redonne le même texte
        assert_eq!(eval_ok(&s), s, "expr={expr:?}");
    }
}

/* ------------------------ Concurrence ------------------------ */

#[test]
fn sci_threads_independants() {
    init_logs();
    let start = Instant::now();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let expr = format!("sqrt({}) + {i}!", i * i);
                eval_ok(&expr)
            })
        })
        .collect();

    let attendus = ["1", "2", "4", "9", "28", "125", "726", "5047"];
    for (h, attendu) in handles.into_iter().zip(attendus) {
        assert_eq!(h.join().expect("thread"), attendu);
    }

    budget(start, Duration::from_secs(10));
}
