//! src/noyau/erreur.rs
//!
//! Taxonomie des erreurs du noyau. Toutes sont déterministes (entrée invalide),
//! aucune n’est rattrapée en interne : elles remontent telles quelles à l’appelant.
//!
//! Les messages sont le contrat externe : ne pas les reformuler.

use super::flottant::ErreurFlottant;
use super::jetons::TypeJeton;

/// Famille d’erreur, exposée à la couche transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Categorie {
    Lexicale,
    Syntaxe,
    Domaine,
    Format,
}

impl Categorie {
    pub fn as_str(self) -> &'static str {
        match self {
            Categorie::Lexicale => "lex",
            Categorie::Syntaxe => "syntax",
            Categorie::Domaine => "domain",
            Categorie::Format => "format",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ErreurCalcul {
    #[error("invalid character: '{0}'")]
    Lexicale(char),
    #[error(transparent)]
    Syntaxe(#[from] ErreurSyntaxe),
    #[error(transparent)]
    Domaine(#[from] ErreurDomaine),
    #[error(transparent)]
    Format(#[from] ErreurFormat),
}

impl ErreurCalcul {
    pub fn categorie(&self) -> Categorie {
        match self {
            ErreurCalcul::Lexicale(_) => Categorie::Lexicale,
            ErreurCalcul::Syntaxe(_) => Categorie::Syntaxe,
            ErreurCalcul::Domaine(_) => Categorie::Domaine,
            ErreurCalcul::Format(_) => Categorie::Format,
        }
    }
}

impl From<ErreurFlottant> for ErreurCalcul {
    fn from(e: ErreurFlottant) -> Self {
        ErreurCalcul::Domaine(e.into())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ErreurSyntaxe {
    #[error("unexpected token: {0}")]
    JetonInattendu(TypeJeton),
    #[error("expecting closing parenthesis")]
    ParentheseFermanteAttendue,
    #[error("expecting opening parenthesis after sqrt")]
    ParentheseOuvranteAttendue,
    #[error("expecting end of expression, got: {0}")]
    FinAttendue(TypeJeton),
    #[error("expression nested too deeply")]
    TropImbrique,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ErreurDomaine {
    #[error("division by zero")]
    DivisionParZero,
    /// Chemin expression : vérifié par l’analyseur avant la primitive.
    #[error("square root of negative number is not defined")]
    RacineNegative,
    /// Chemin structuré : vérifié par la primitive elle-même.
    #[error("cannot compute sqrt of negative number")]
    RacineNegativeStructuree,
    #[error("square root did not converge")]
    RacineNonConvergente,
    #[error("factorial of negative number is not defined")]
    FactorielleNegative,
    #[error("factorial of non-integer number is not defined")]
    FactorielleNonEntiere,
    /// L’opérande n’est cité que s’il tient dans un i64.
    #[error("factorial input too large{}", citer_entier(.0))]
    FactorielleTropGrande(Option<i64>),
    #[error("unexpected expression: non-integer exponent not supported")]
    ExposantNonEntier,
    #[error("exponent too large")]
    ExposantTropGrand,
    #[error("unsupported operator: {0}")]
    OperateurNonSupporte(String),
    #[error("numeric overflow")]
    Debordement,
}

fn citer_entier(n: &Option<i64>) -> String {
    n.map(|n| format!(": {n}")).unwrap_or_default()
}

impl From<ErreurFlottant> for ErreurDomaine {
    fn from(e: ErreurFlottant) -> Self {
        match e {
            ErreurFlottant::DivisionParZero => ErreurDomaine::DivisionParZero,
            ErreurFlottant::Debordement => ErreurDomaine::Debordement,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ErreurFormat {
    #[error("invalid number: {0}")]
    NombreInvalide(String),
    #[error("missing operand for operator: {0}")]
    OperandeManquante(String),
}
