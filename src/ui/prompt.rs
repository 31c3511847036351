//! Interactive confirmation

use std::io::{self, BufRead, Write};
use std::path::Path;

/// Ask whether a missing destination should be created
///
/// Empty input (including EOF), `y` and `yes` accept; anything else declines.
pub fn confirm_create<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    destination: &Path,
) -> io::Result<bool> {
    write!(
        output,
        "Destination directory {} does not exist, shall it be created (Y/n)? ",
        destination.display()
    )?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.is_empty() || answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(answer: &str) -> (bool, String) {
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut output = Vec::new();
        let accepted =
            confirm_create(&mut input, &mut output, Path::new("/backup")).expect("prompt");
        (accepted, String::from_utf8(output).expect("utf8 prompt"))
    }

    #[test]
    fn test_empty_answer_accepts() {
        assert!(ask("\n").0);
        assert!(ask("").0);
    }

    #[test]
    fn test_yes_answers_accept() {
        for answer in ["y\n", "Y\n", "yes\n", "YES\r\n", "  y  \n"] {
            assert!(ask(answer).0, "{answer:?} should accept");
        }
    }

    #[test]
    fn test_other_answers_decline() {
        for answer in ["n\n", "no\n", "nope\n", "q\n"] {
            assert!(!ask(answer).0, "{answer:?} should decline");
        }
    }

    #[test]
    fn test_prompt_names_destination() {
        let (_, prompt) = ask("\n");
        assert!(prompt.contains("Destination directory /backup does not exist"));
        assert!(prompt.contains("(Y/n)?"));
    }
}
