// src/noyau/jetons.rs

use std::fmt;

use super::erreur::ErreurCalcul;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeJeton {
    Nombre,

    Plus,
    Moins,
    Fois,
    Divise,
    Puissance, // ^
    Factorielle, // ! (postfixé)
    Racine,    // sqrt

    LPar,
    RPar,

    Fin,
}

impl fmt::Display for TypeJeton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nom = match self {
            TypeJeton::Nombre => "NUMBER",
            TypeJeton::Plus => "PLUS",
            TypeJeton::Moins => "MINUS",
            TypeJeton::Fois => "TIMES",
            TypeJeton::Divise => "DIVIDE",
            TypeJeton::Puissance => "POWER",
            TypeJeton::Factorielle => "FACTORIAL",
            TypeJeton::Racine => "SQRT",
            TypeJeton::LPar => "LPAREN",
            TypeJeton::RPar => "RPAREN",
            TypeJeton::Fin => "END",
        };
        f.write_str(nom)
    }
}

/// Jeton immuable : genre + lexème brut (vide pour Fin).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Jeton {
    pub genre: TypeJeton,
    pub texte: String,
}

impl Jeton {
    fn new(genre: TypeJeton, texte: impl Into<String>) -> Self {
        Self {
            genre,
            texte: texte.into(),
        }
    }

    pub fn fin() -> Self {
        Self::new(TypeJeton::Fin, "")
    }
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - nombres `chiffres (. chiffres)?` ; un nombre peut aussi commencer par `.` (ex: .5)
/// - opérateurs + - * / ^ !
/// - parenthèses ( )
/// - `sqrt` (exactement, sensible à la casse)
/// - espaces et tabulations ignorés
///
/// La suite renvoyée se termine TOUJOURS par un unique jeton Fin ;
/// en cas d’erreur, rien de partiel n’est exposé.
pub fn tokenize(s: &str) -> Result<Vec<Jeton>, ErreurCalcul> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == ' ' || c == '\t' {
            i += 1;
            continue;
        }

        // Nombre (plus longue correspondance)
        if c.is_ascii_digit() || (c == '.' && chiffre_en(&chars, i + 1)) {
            let start = i;
            while chiffre_en(&chars, i) {
                i += 1;
            }
            // partie décimale : seulement si '.' est suivi d’au moins un chiffre
            if i < chars.len() && chars[i] == '.' && chiffre_en(&chars, i + 1) {
                i += 1;
                while chiffre_en(&chars, i) {
                    i += 1;
                }
            }
            let lexeme: String = chars[start..i].iter().collect();
            out.push(Jeton::new(TypeJeton::Nombre, lexeme));
            continue;
        }

        // Opérateurs + parenthèses
        let genre = match c {
            '+' => Some(TypeJeton::Plus),
            '-' => Some(TypeJeton::Moins),
            '*' => Some(TypeJeton::Fois),
            '/' => Some(TypeJeton::Divise),
            '^' => Some(TypeJeton::Puissance),
            '!' => Some(TypeJeton::Factorielle),
            '(' => Some(TypeJeton::LPar),
            ')' => Some(TypeJeton::RPar),
            _ => None,
        };
        if let Some(genre) = genre {
            out.push(Jeton::new(genre, c.to_string()));
            i += 1;
            continue;
        }

        // Repli : `sqrt` (4 caractères exacts) avant de déclarer le caractère invalide
        if chars[i..].starts_with(&['s', 'q', 'r', 't']) {
            out.push(Jeton::new(TypeJeton::Racine, "sqrt"));
            i += 4;
            continue;
        }

        return Err(ErreurCalcul::Lexicale(c));
    }

    out.push(Jeton::fin());
    log::debug!("jetons: {}", format_jetons(&out));
    Ok(out)
}

fn chiffre_en(chars: &[char], i: usize) -> bool {
    chars.get(i).is_some_and(|c| c.is_ascii_digit())
}

/// Format utilitaire (debug/“démarche”) : liste de jetons en texte.
pub fn format_jetons(jetons: &[Jeton]) -> String {
    let mut out = Vec::new();
    for j in jetons {
        let s = match j.genre {
            TypeJeton::Fin => "⊣".to_string(),
            _ => j.texte.clone(),
        };
        out.push(s);
    }
    out.join(" ")
}
