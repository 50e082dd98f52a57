//! Noyau : évaluation (points d’entrée)
//!
//! Deux entrées pour un même noyau :
//! - `eval_expression` : texte libre -> jetons -> descente récursive (évaluée à la volée)
//! - `calculer`        : triplet {num1, num2, operator} -> primitive directe, sans analyseur
//!
//! Chaque appel construit ses propres jetons / analyseur : aucun état partagé,
//! appels concurrents sans verrou. Le résultat visible est ré-arrondi au plus proche pair.

use std::str::FromStr;

use super::analyse::Analyseur;
use super::erreur::{ErreurCalcul, ErreurDomaine, ErreurFormat};
use super::flottant::Flottant;
use super::jetons::tokenize;
use super::primitives::Primitives;
use super::reglages::Reglages;

/// API publique : évalue une expression texte.
pub fn eval_expression(expr_str: &str, reglages: &Reglages) -> Result<Flottant, ErreurCalcul> {
    log::debug!("eval_expression({expr_str:?})");

    let jetons = tokenize(expr_str)?;
    let mut analyseur = Analyseur::new(jetons, reglages);
    let valeur = analyseur.expression()?;
    analyseur.terminer()?;

    Ok(valeur.arrondi(reglages.contexte_final())?)
}

/* ------------------------ Entrée structurée ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operateur {
    Plus,
    Moins,
    Fois,
    Divise,
    Puissance,
    Factorielle,
    Racine,
}

impl FromStr for Operateur {
    type Err = ErreurDomaine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Operateur::Plus),
            "-" => Ok(Operateur::Moins),
            "*" => Ok(Operateur::Fois),
            "/" => Ok(Operateur::Divise),
            "^" => Ok(Operateur::Puissance),
            "!" => Ok(Operateur::Factorielle),
            "sqrt" => Ok(Operateur::Racine),
            autre => Err(ErreurDomaine::OperateurNonSupporte(autre.to_string())),
        }
    }
}

fn lire_operande(prim: &Primitives<'_>, texte: &str) -> Result<Flottant, ErreurCalcul> {
    prim.nombre(texte)
        .ok_or_else(|| ErreurFormat::NombreInvalide(texte.to_string()).into())
}

/// API publique : opération unique sur opérandes pré-découpés.
/// `num2` vide ou absent = absent (requis pour les opérateurs binaires).
/// Intermédiaires tronqués (vers zéro), résultat final au plus proche pair.
pub fn calculer(
    num1: &str,
    num2: Option<&str>,
    operateur: &str,
    reglages: &Reglages,
) -> Result<Flottant, ErreurCalcul> {
    log::debug!("calculer({num1:?}, {num2:?}, {operateur:?})");

    let prim = Primitives::structure(reglages);

    let a = lire_operande(&prim, num1)?;
    let b = match num2.filter(|s| !s.is_empty()) {
        Some(s) => Some(lire_operande(&prim, s)?),
        None => None,
    };
    let op: Operateur = operateur.parse()?;

    let second = || {
        b.as_ref()
            .ok_or_else(|| ErreurCalcul::from(ErreurFormat::OperandeManquante(operateur.to_string())))
    };

    let resultat = match op {
        Operateur::Plus => prim.ajouter(&a, second()?)?,
        Operateur::Moins => prim.soustraire(&a, second()?)?,
        Operateur::Fois => prim.multiplier(&a, second()?)?,
        Operateur::Divise => prim.diviser(&a, second()?)?,
        Operateur::Puissance => prim.puissance(&a, second()?)?,
        // num2 ignoré
        Operateur::Factorielle => prim.factorielle(&a)?,
        Operateur::Racine => prim.racine_carree(&a)?,
    };

    Ok(resultat.arrondi(reglages.contexte_final())?)
}
