//! src/noyau/reglages.rs
//!
//! Réglages du noyau : construits UNE fois, puis passés par référence
//! (analyseur + primitives). Aucune constante numérique globale mutable.
//!
//! Contrats :
//! - Précision bornée (anti-abus / anti-gel).
//! - Bornes explicites sur factorielle, exposant, Newton, profondeur d’imbrication.

use super::flottant::{Arrondi, Contexte, Flottant};

/// Précision par défaut (bits de mantisse).
pub const PRECISION_DEFAUT: u64 = 256;

/// Garde-fous sur la précision.
pub const PRECISION_MIN: u64 = 64;
pub const PRECISION_MAX: u64 = 4096;

const FACTORIELLE_MAX_DEFAUT: u64 = 500;
const EXPOSANT_MAX_DEFAUT: u64 = 10_000;
const TOLERANCE_RACINE_DEFAUT: &str = "1e-200";
const ITERATIONS_RACINE_MAX_DEFAUT: u32 = 100_000;
const PROFONDEUR_MAX_DEFAUT: usize = 256;
const DECIMALES_DEFAUT: usize = 6;

/// Garde-fou : au-delà, le formatage (10^n) coûterait plus que le calcul.
pub const DECIMALES_MAX: usize = 1000;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ErreurReglages {
    #[error("precision must be between 64 and 4096 bits, got {0}")]
    Precision(u64),
    #[error("invalid root tolerance: {0}")]
    Tolerance(String),
}

#[derive(Clone, Debug)]
pub struct Reglages {
    precision: u64,
    arrondi: Arrondi,
    arrondi_structure: Arrondi,
    factorielle_max: u64,
    exposant_max: u64,
    tolerance_racine: Flottant,
    iterations_racine_max: u32,
    profondeur_max: usize,
    decimales: usize,
}

impl Default for Reglages {
    fn default() -> Self {
        let precision = PRECISION_DEFAUT;
        let ctx = Contexte::new(precision, Arrondi::PlusProchePair);
        Self {
            precision,
            arrondi: Arrondi::PlusProchePair,
            arrondi_structure: Arrondi::VersZero,
            factorielle_max: FACTORIELLE_MAX_DEFAUT,
            exposant_max: EXPOSANT_MAX_DEFAUT,
            tolerance_racine: Flottant::depuis_decimal(TOLERANCE_RACINE_DEFAUT, ctx)
                .unwrap_or_else(Flottant::zero),
            iterations_racine_max: ITERATIONS_RACINE_MAX_DEFAUT,
            profondeur_max: PROFONDEUR_MAX_DEFAUT,
            decimales: DECIMALES_DEFAUT,
        }
    }
}

impl Reglages {
    /* ------------------------ Construction (consomme self) ------------------------ */

    pub fn avec_precision(mut self, bits: u64) -> Result<Self, ErreurReglages> {
        if !(PRECISION_MIN..=PRECISION_MAX).contains(&bits) {
            return Err(ErreurReglages::Precision(bits));
        }
        self.precision = bits;
        // la tolérance suit la nouvelle précision
        self.tolerance_racine = self
            .tolerance_racine
            .arrondi(self.contexte())
            .unwrap_or_else(|_| Flottant::zero());
        Ok(self)
    }

    pub fn avec_tolerance_racine(mut self, texte: &str) -> Result<Self, ErreurReglages> {
        let tol = Flottant::depuis_decimal(texte, self.contexte())
            .filter(|t| !t.est_negatif() && !t.est_zero())
            .ok_or_else(|| ErreurReglages::Tolerance(texte.to_string()))?;
        self.tolerance_racine = tol;
        Ok(self)
    }

    pub fn avec_arrondi(mut self, arrondi: Arrondi) -> Self {
        self.arrondi = arrondi;
        self
    }

    pub fn avec_factorielle_max(mut self, n: u64) -> Self {
        self.factorielle_max = n;
        self
    }

    pub fn avec_exposant_max(mut self, n: u64) -> Self {
        self.exposant_max = n;
        self
    }

    pub fn avec_iterations_racine_max(mut self, n: u32) -> Self {
        self.iterations_racine_max = n.max(1);
        self
    }

    pub fn avec_profondeur_max(mut self, n: usize) -> Self {
        self.profondeur_max = n.max(1);
        self
    }

    pub fn avec_decimales(mut self, n: usize) -> Self {
        self.decimales = n.min(DECIMALES_MAX);
        self
    }

    /* ------------------------ Lecture ------------------------ */

    pub fn precision(&self) -> u64 {
        self.precision
    }

    /// Contexte du chemin “expression” (et du résultat final).
    pub fn contexte(&self) -> Contexte {
        Contexte::new(self.precision, self.arrondi)
    }

    /// Contexte des calculs intermédiaires du chemin structuré {num1, num2, operator}.
    pub fn contexte_structure(&self) -> Contexte {
        Contexte::new(self.precision, self.arrondi_structure)
    }

    /// Contexte du résultat visible : toujours au plus proche pair.
    pub fn contexte_final(&self) -> Contexte {
        Contexte::new(self.precision, Arrondi::PlusProchePair)
    }

    pub fn factorielle_max(&self) -> u64 {
        self.factorielle_max
    }

    pub fn exposant_max(&self) -> u64 {
        self.exposant_max
    }

    pub fn tolerance_racine(&self) -> &Flottant {
        &self.tolerance_racine
    }

    pub fn iterations_racine_max(&self) -> u32 {
        self.iterations_racine_max
    }

    pub fn profondeur_max(&self) -> usize {
        self.profondeur_max
    }

    pub fn decimales(&self) -> usize {
        self.decimales
    }
}
