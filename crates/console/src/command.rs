use glam::Vec3;
use walkabout_camera::{CameraMode, Projection};

/// A parsed console command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Help,
    Clear,
    /// Set the vertical field of view in degrees.
    Fov(f32),
    /// Teleport the camera to a world position.
    Teleport(Vec3),
    Mode(CameraMode),
    Projection(Projection),
    /// Regenerate the scene with a new seed.
    Seed(u64),
    Quit,
}

impl Command {
    pub const HELP_TEXT: &'static str = "commands: help | clear | fov <deg> | tp <x> <y> <z> | \
         mode <free|first|third|orbital> | projection <perspective|orthographic> | \
         seed <n> | quit";
}

/// Errors from parsing a console line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{command} expects {expected} argument(s), got {actual}")]
    Arity {
        command: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("bad argument for {command}: {argument}")]
    Argument {
        command: &'static str,
        argument: String,
    },
}

/// Parse a single console line. Verbs are case-insensitive.
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let mut words = line.split_whitespace();
    let verb = words.next().ok_or(ParseError::Empty)?.to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    match verb.as_str() {
        "help" => expecting("help", 0, &args).map(|_| Command::Help),
        "clear" => expecting("clear", 0, &args).map(|_| Command::Clear),
        "quit" | "exit" => expecting("quit", 0, &args).map(|_| Command::Quit),
        "fov" => {
            expecting("fov", 1, &args)?;
            let degrees = number("fov", args[0])?;
            Ok(Command::Fov(degrees))
        }
        "tp" => {
            expecting("tp", 3, &args)?;
            Ok(Command::Teleport(Vec3::new(
                number("tp", args[0])?,
                number("tp", args[1])?,
                number("tp", args[2])?,
            )))
        }
        "mode" => {
            expecting("mode", 1, &args)?;
            let mode = match args[0].to_ascii_lowercase().as_str() {
                "free" => CameraMode::Free,
                "first" => CameraMode::FirstPerson,
                "third" => CameraMode::ThirdPerson,
                "orbital" => CameraMode::Orbital,
                other => {
                    return Err(ParseError::Argument {
                        command: "mode",
                        argument: other.into(),
                    });
                }
            };
            Ok(Command::Mode(mode))
        }
        "projection" => {
            expecting("projection", 1, &args)?;
            let projection = match args[0].to_ascii_lowercase().as_str() {
                "perspective" | "persp" => Projection::Perspective,
                "orthographic" | "ortho" => Projection::Orthographic,
                other => {
                    return Err(ParseError::Argument {
                        command: "projection",
                        argument: other.into(),
                    });
                }
            };
            Ok(Command::Projection(projection))
        }
        "seed" => {
            expecting("seed", 1, &args)?;
            let seed = args[0].parse().map_err(|_| ParseError::Argument {
                command: "seed",
                argument: args[0].into(),
            })?;
            Ok(Command::Seed(seed))
        }
        _ => Err(ParseError::Unknown(verb)),
    }
}

fn expecting(command: &'static str, expected: usize, args: &[&str]) -> Result<(), ParseError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ParseError::Arity {
            command,
            expected,
            actual: args.len(),
        })
    }
}

fn number(command: &'static str, raw: &str) -> Result<f32, ParseError> {
    let value: f32 = raw.parse().map_err(|_| ParseError::Argument {
        command,
        argument: raw.into(),
    })?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParseError::Argument {
            command,
            argument: raw.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_are_case_insensitive() {
        assert_eq!(parse("HELP"), Ok(Command::Help));
        assert_eq!(parse("Quit"), Ok(Command::Quit));
    }

    #[test]
    fn fov_parses_number() {
        assert_eq!(parse("fov 60"), Ok(Command::Fov(60.0)));
        assert_eq!(parse("fov 72.5"), Ok(Command::Fov(72.5)));
    }

    #[test]
    fn teleport_takes_three_coordinates() {
        assert_eq!(
            parse("tp 1 2.5 -3"),
            Ok(Command::Teleport(Vec3::new(1.0, 2.5, -3.0)))
        );
        assert!(matches!(
            parse("tp 1 2"),
            Err(ParseError::Arity {
                command: "tp",
                expected: 3,
                actual: 2,
            })
        ));
    }

    #[test]
    fn mode_and_projection_names() {
        assert_eq!(parse("mode third"), Ok(Command::Mode(CameraMode::ThirdPerson)));
        assert_eq!(
            parse("projection ortho"),
            Ok(Command::Projection(Projection::Orthographic))
        );
        assert!(matches!(
            parse("mode sideways"),
            Err(ParseError::Argument { .. })
        ));
    }

    #[test]
    fn seed_is_unsigned() {
        assert_eq!(parse("seed 99"), Ok(Command::Seed(99)));
        assert!(matches!(parse("seed -1"), Err(ParseError::Argument { .. })));
    }

    #[test]
    fn rejects_unknown_and_empty() {
        assert!(matches!(parse("warp 1"), Err(ParseError::Unknown(_))));
        assert_eq!(parse("   "), Err(ParseError::Empty));
    }

    #[test]
    fn rejects_non_finite_numbers() {
        assert!(matches!(parse("fov inf"), Err(ParseError::Argument { .. })));
        assert!(matches!(parse("fov NaN"), Err(ParseError::Argument { .. })));
    }

    #[test]
    fn extra_arguments_are_an_error() {
        assert!(matches!(parse("help me"), Err(ParseError::Arity { .. })));
    }
}
