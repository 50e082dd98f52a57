//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - aucune panique : toute entrée donne Ok ou une erreur typée
//! - invariant clé : une expression issue de la grammaire n’échoue jamais en lexical

use std::time::{Duration, Instant};

use super::erreur::ErreurSyntaxe;
use super::{calculer, eval_expression, formater, Categorie, ErreurCalcul, Reglages};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => "0".to_string(),
        1 => format!("{}", rng.pick(10)),
        2 => format!("{}", rng.pick(1000)),
        3 => format!("{}.{}", rng.pick(100), rng.pick(100)),
        4 => format!(".{}", rng.pick(10)),
        _ => format!("{}", rng.pick(7)),
    }
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(4) {
        0 => format!("-{}", gen_nombre(rng)),
        1 => format!("sqrt({})", gen_nombre(rng)),
        // petite factorielle : reste dans la borne
        2 => format!("{}!", rng.pick(8)),
        _ => gen_nombre(rng),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(9) {
        0 => gen_atom(rng),
        1 => format!("({}+{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        2 => format!("({}-{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        3 => format!("({}*{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        4 => format!("({}/{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        // exposant petit : évite de ne tester que « exponent too large »
        5 => format!("({})^{}", gen_expr(rng, depth - 1), rng.pick(5)),
        6 => format!("sqrt({})", gen_expr(rng, depth - 1)),
        7 => format!("-({})", gen_expr(rng, depth - 1)),
        _ => {
            if rng.coin() {
                format!("({})!", gen_expr(rng, depth - 1))
            } else {
                gen_atom(rng)
            }
        }
    }
}

/// Texte arbitraire (alphabet restreint) : vise le lexer et l’analyseur.
fn gen_bruit(rng: &mut Rng, len: usize) -> String {
    const ALPHABET: &[char] = &[
        '0', '1', '7', '.', '+', '-', '*', '/', '^', '!', '(', ')', ' ', '\t', 's', 'q', 'r', 't',
        'x', '@', 'e',
    ];
    (0..len)
        .map(|_| ALPHABET[rng.pick(ALPHABET.len() as u32) as usize])
        .collect()
}

fn rendu(r: &Result<super::Flottant, ErreurCalcul>, reglages: &Reglages) -> String {
    match r {
        Ok(v) => formater(v, reglages),
        Err(e) => format!("{}: {e}", e.categorie().as_str()),
    }
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_grammaire_et_taxonomie() {
    let t0 = Instant::now();
    let max = Duration::from_secs(20);
    let reglages = Reglages::default();

    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..150 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);

        match eval_expression(&expr, &reglages) {
            Ok(_) => seen_ok += 1,
            Err(e) => {
                // grammaire respectée => seules les erreurs de domaine sont possibles
                assert_eq!(
                    e.categorie(),
                    Categorie::Domaine,
                    "erreur non attendue: expr={expr:?} err={e}"
                );
                seen_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_secs(20);
    let reglages = Reglages::default();

    // Même seed => mêmes expressions => mêmes sorties
    let passe = |seed: u64| -> Vec<String> {
        let mut rng = Rng::new(seed);
        (0..60)
            .map(|_| {
                budget(t0, max);
                let expr = gen_expr(&mut rng, 3);
                rendu(&eval_expression(&expr, &reglages), &reglages)
            })
            .collect()
    };

    assert_eq!(passe(0xBADC0DE), passe(0xBADC0DE));
}

#[test]
fn fuzz_safe_bruit_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_secs(20);
    let reglages = Reglages::default();

    let mut rng = Rng::new(0x5EED_u64);

    for _ in 0..400 {
        budget(t0, max);

        let len = rng.pick(24) as usize;
        let texte = gen_bruit(&mut rng, len);

        // le seul contrat : pas de panique, erreur classée
        if let Err(e) = eval_expression(&texte, &reglages) {
            let c = e.categorie();
            if texte.contains('@') || texte.contains('x') {
                // la tokenisation précède toute évaluation
                assert_eq!(c, Categorie::Lexicale, "texte={texte:?} err={e}");
            }
            assert!(!e.to_string().is_empty());
        }
    }
}

#[test]
fn fuzz_safe_structure() {
    let t0 = Instant::now();
    let max = Duration::from_secs(20);
    let reglages = Reglages::default();

    const OPS: &[&str] = &["+", "-", "*", "/", "^", "!", "sqrt", "%", ""];

    let mut rng = Rng::new(0xFACADE_u64);

    for _ in 0..300 {
        budget(t0, max);

        let a = gen_nombre(&mut rng);
        let b = if rng.coin() { Some(gen_nombre(&mut rng)) } else { None };
        let op = OPS[rng.pick(OPS.len() as u32) as usize];

        match calculer(&a, b.as_deref(), op, &reglages) {
            Ok(_) => {}
            Err(e) => {
                // opérandes générés toujours valides : jamais lexical / syntaxe
                assert!(
                    matches!(e.categorie(), Categorie::Domaine | Categorie::Format),
                    "a={a:?} b={b:?} op={op:?} err={e}"
                );
                if e.categorie() == Categorie::Format {
                    assert!(b.is_none(), "a={a:?} b={b:?} op={op:?} err={e}");
                }
            }
        }
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);
    let reglages = Reglages::default();

    let expr = somme_balancee("1/2", 800);
    let v = eval_expression(&expr, &reglages).unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    // 800*(1/2) = 400
    assert_eq!(formater(&v, &reglages), "400");
}

#[test]
fn fuzz_safe_imbrication_profonde() {
    let reglages = Reglages::default();

    for n in [300usize, 5_000, 100_000] {
        let expr = format!("{}1{}", "(".repeat(n), ")".repeat(n));
        assert_eq!(
            eval_expression(&expr, &reglages),
            Err(ErreurCalcul::Syntaxe(ErreurSyntaxe::TropImbrique)),
            "n={n}"
        );
    }
}
