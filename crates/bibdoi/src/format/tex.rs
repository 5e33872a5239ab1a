//! Transliteration of Unicode text for TeX and for citation labels.

use std::collections::HashMap;

use lazy_static::lazy_static;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

lazy_static! {
    // Characters that are not a base letter plus a combining accent.
    static ref LETTERS: HashMap<char, &'static str> = HashMap::from([
        ('ß', r"{\ss}"),
        ('æ', r"{\ae}"),
        ('Æ', r"{\AE}"),
        ('œ', r"{\oe}"),
        ('Œ', r"{\OE}"),
        ('ø', r"{\o}"),
        ('Ø', r"{\O}"),
        ('å', r"{\aa}"),
        ('Å', r"{\AA}"),
        ('ł', r"{\l}"),
        ('Ł', r"{\L}"),
        ('ı', r"{\i}"),
        ('ȷ', r"{\j}"),
        ('đ', r"{\dj}"),
        ('Đ', r"{\DJ}"),
        ('ð', r"{\dh}"),
        ('Ð', r"{\DH}"),
        ('þ', r"{\th}"),
        ('Þ', r"{\TH}"),
        ('¡', r"{!`}"),
        ('¿', r"{?`}"),
        ('§', r"{\S}"),
        ('¶', r"{\P}"),
        ('©', r"{\copyright}"),
        ('–', "--"),
        ('—', "---"),
        ('‘', "`"),
        ('’', "'"),
        ('“', "``"),
        ('”', "''"),
        ('&', r"\&"),
        ('%', r"\%"),
        ('#', r"\#"),
        ('_', r"\_"),
    ]);
}

/// TeX accent command for a combining mark and whether the command is a letter (`\v`) rather
/// than a symbol (`\'`).
const fn accent(mark: char) -> Option<(&'static str, bool)> {
    let accent = match mark {
        '\u{0300}' => ("`", false),
        '\u{0301}' => ("'", false),
        '\u{0302}' => ("^", false),
        '\u{0303}' => ("~", false),
        '\u{0304}' => ("=", false),
        '\u{0306}' => ("u", true),
        '\u{0307}' => (".", false),
        '\u{0308}' => ("\"", false),
        '\u{030A}' => ("r", true),
        '\u{030B}' => ("H", true),
        '\u{030C}' => ("v", true),
        '\u{0323}' => ("d", true),
        '\u{0327}' => ("c", true),
        '\u{0328}' => ("k", true),
        '\u{0331}' => ("b", true),
        _ => return None,
    };
    Some(accent)
}

/// Marks placed below the letter keep the dot of `i` and `j`.
const fn is_below(mark: char) -> bool {
    matches!(mark, '\u{0323}' | '\u{0327}' | '\u{0328}' | '\u{0331}')
}

/// Transliterate `value` to TeX escape sequences.
///
/// Accented letters become accent commands, a few letters and the TeX specials `& % # _` use
/// their macros. Anything else, including characters with no known mapping, passes through.
///
/// ```
/// use bibdoi::format::tex::to_tex;
///
/// assert_eq!(r#"M{\"u}ller \& Sons"#, to_tex("Müller & Sons"));
/// assert_eq!(r"{\v{C}}apek", to_tex("Čapek"));
/// ```
#[must_use]
pub fn to_tex(value: &str) -> String {
    let mut tex = String::with_capacity(value.len());

    for c in value.chars() {
        if let Some(escape) = LETTERS.get(&c) {
            tex.push_str(escape);
        } else if let Some(escape) = accented(c) {
            tex.push_str(&escape);
        } else {
            tex.push(c);
        }
    }

    tex
}

fn accented(c: char) -> Option<String> {
    if c.is_ascii() {
        return None;
    }

    let mut decomposed = std::iter::once(c).nfd();
    let (base, mark) = (decomposed.next()?, decomposed.next()?);
    if decomposed.next().is_some() {
        return None;
    }

    let (command, is_letter) = accent(mark)?;
    let base = match base {
        'i' if !is_below(mark) => r"\i".to_owned(),
        'j' if !is_below(mark) => r"\j".to_owned(),
        base => base.to_string(),
    };

    Some(if is_letter {
        format!("{{\\{command}{{{base}}}}}")
    } else {
        format!("{{\\{command}{base}}}")
    })
}

/// Strip diacritics from `value` by canonical decomposition, e.g. `Müller` to `Muller`.
///
/// Letters that do not decompose (`ø`, `ß`) are kept as they are.
#[must_use]
pub fn to_ascii(value: &str) -> String {
    value.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_accents_are_braced() {
        assert_eq!(r"{\'e}t{\'e}", to_tex("été"));
        assert_eq!(r#"G{\"o}del"#, to_tex("Gödel"));
        assert_eq!(r"Fran{\c{c}}ois", to_tex("François"));
        assert_eq!(r"Nu{\~n}ez", to_tex("Nuñez"));
    }

    #[test]
    fn letter_accents_take_an_argument() {
        assert_eq!(r"Erd{\H{o}}s", to_tex("Erdős"));
        assert_eq!(r"{\v{S}}koda", to_tex("Škoda"));
    }

    #[test]
    fn dotless_i_is_used_under_accents_above() {
        assert_eq!(r"Mart{\'\i}n", to_tex("Martín"));
        assert_eq!(r"{\d{i}}", to_tex("ị"));
    }

    #[test]
    fn special_letters_and_tex_specials() {
        assert_eq!(r"Stra{\ss}e", to_tex("Straße"));
        assert_eq!(r"{\O}deg{\aa}rd", to_tex("Ødegård"));
        assert_eq!(r"100\% \& more\_stuff \#1", to_tex("100% & more_stuff #1"));
        assert_eq!("pages 1--2", to_tex("pages 1–2"));
    }

    #[test]
    fn unmapped_characters_pass_through() {
        assert_eq!("Plain ASCII (title): 1/2", to_tex("Plain ASCII (title): 1/2"));
        assert_eq!("量子", to_tex("量子"));
        assert_eq!("ệ", to_tex("ệ"));
    }

    #[test]
    fn ascii_strips_diacritics() {
        assert_eq!("Muller", to_ascii("Müller"));
        assert_eq!("Nunez", to_ascii("Núñez"));
        assert_eq!("Ødegard", to_ascii("Ødegård"));
    }
}
