use crate::domain::models::{ErrorBody, JsonErr, JsonOut};
use serde::Serialize;

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

/// Like [`print_out`] for a single value; `ok` mirrors the command verdict
/// so JSON consumers need not re-derive it.
pub fn print_one<T: Serialize>(
    json: bool,
    ok: bool,
    data: T,
    render: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok, data })?
        );
    } else {
        println!("{}", render(&data));
    }
    Ok(())
}

pub fn error_body(err: &anyhow::Error) -> JsonErr {
    JsonErr {
        ok: false,
        error: ErrorBody {
            code: "command_failed".to_string(),
            message: format!("{err:#}"),
        },
    }
}

/// Failure path for `main`: JSON envelope on stdout, or `error: …` on stderr.
pub fn print_error(json: bool, err: &anyhow::Error) {
    if json {
        match serde_json::to_string_pretty(&error_body(err)) {
            Ok(s) => println!("{s}"),
            Err(_) => eprintln!("error: {err:#}"),
        }
    } else {
        eprintln!("error: {err:#}");
    }
}

#[cfg(test)]
mod tests {
    use super::error_body;

    #[test]
    fn error_envelope_keeps_context_chain() {
        let err = anyhow::anyhow!("inner").context("outer");
        let v = serde_json::to_value(error_body(&err)).unwrap();
        assert_eq!(v["ok"], false);
        assert_eq!(v["error"]["code"], "command_failed");
        assert_eq!(v["error"]["message"], "outer: inner");
    }
}
