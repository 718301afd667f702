// This file is part of yash, an extended POSIX shell.
// Copyright (C) 2023 WATANABE Yuki
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Reporting the result to the environment

use super::indexes_to_optind;
use super::model;
use thiserror::Error;
use yash_env::semantics::Field;
use yash_env::variable::AssignError;
use yash_env::variable::Scope;
use yash_env::variable::UnsetError;
use yash_env::variable::Value;
use yash_env::Env;
use yash_syntax::source::pretty::Annotation;
use yash_syntax::source::pretty::AnnotationType;
use yash_syntax::source::pretty::Message;
use yash_syntax::source::Location;

/// Error in reporting the result to the environment
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// Error in assigning to a read-only variable
    #[error("cannot update read-only variable `{name}`")]
    AssignReadOnlyError {
        /// Name of the variable that was being assigned
        name: String,
        /// Value that was being assigned
        new_value: Value,
        /// Location of the failed assignment
        assigned_location: Option<Location>,
        /// Location where the variable was made read-only
        read_only_location: Location,
    },

    /// Error in unsetting a read-only variable
    #[error("cannot unset read-only variable `{name}`")]
    UnsetReadOnlyError {
        /// Name of the variable that was being unset
        name: String,
        /// Location where the variable was made read-only
        read_only_location: Location,
    },
}

impl From<UnsetError<'_>> for Error {
    fn from(e: UnsetError) -> Self {
        Error::UnsetReadOnlyError {
            name: e.name.to_owned(),
            read_only_location: e.read_only_location.clone(),
        }
    }
}

impl Error {
    #[must_use]
    fn with_name_and_assign_error(name: String, e: AssignError) -> Self {
        Error::AssignReadOnlyError {
            name,
            new_value: e.new_value,
            assigned_location: e.assigned_location,
            read_only_location: e.read_only_location,
        }
    }

    /// Converts this error to a printable message.
    pub fn to_message(&self) -> Message {
        let mut annotations = Vec::new();

        match self {
            Error::AssignReadOnlyError {
                name,
                new_value,
                assigned_location,
                read_only_location,
            } => {
                if let Some(location) = assigned_location {
                    annotations.push(Annotation::new(
                        AnnotationType::Info,
                        format!(
                            "the built-in needs to update the variable to `{}`",
                            new_value.quote()
                        )
                        .into(),
                        location,
                    ));
                }

                annotations.push(Annotation::new(
                    AnnotationType::Info,
                    format!("`{name}` was made read-only here").into(),
                    read_only_location,
                ));
            }

            Error::UnsetReadOnlyError {
                name,
                read_only_location,
            } => {
                annotations.push(Annotation::new(
                    AnnotationType::Info,
                    format!("`{name}` was made read-only here").into(),
                    read_only_location,
                ));
            }
        }

        Message {
            r#type: AnnotationType::Error,
            title: self.to_string().into(),
            annotations,
        }
    }
}

impl model::Result {
    /// Updates variables to reflect the result and returns an error message to
    /// be printed to the standard error.
    ///
    /// The `colon` parameter must be `true` if and only if the option
    /// specification starts with a colon (`:`).
    ///
    /// This method updates `$OPTIND`, `$OPTARG`, and the variable named by
    /// `var_name` to reflect the result. If the result is an error and `colon`
    /// is `false`, this method returns an error message. Otherwise, this method
    /// returns an empty string.
    pub fn report(self, env: &mut Env, colon: bool, var_name: Field) -> Result<String, Error> {
        let location = env.stack.current_builtin().map(|b| b.name.origin.clone());

        let (var_value, optarg, message) = match self.option {
            None => ("?".to_string(), None, String::new()),

            Some(model::OptionOccurrence {
                option,
                argument,
                error: None,
            }) => (option.to_string(), argument, String::new()),

            Some(model::OptionOccurrence {
                option,
                error: Some(model::Error::UnknownOption),
                ..
            }) if colon => ("?".to_string(), Some(option.to_string()), String::new()),

            Some(model::OptionOccurrence {
                option,
                error: Some(model::Error::MissingArgument),
                ..
            }) if colon => (":".to_string(), Some(option.to_string()), String::new()),

            Some(model::OptionOccurrence {
                option,
                error: Some(model::Error::UnknownOption),
                ..
            }) => {
                let message = format!("{}: invalid option `-{}`\n", env.arg0, option);
                ("?".to_string(), None, message)
            }

            Some(model::OptionOccurrence {
                option,
                error: Some(model::Error::MissingArgument),
                ..
            }) => {
                let message = format!("{}: option `-{}` requires an argument\n", env.arg0, option);
                ("?".to_string(), None, message)
            }
        };

        env.get_or_create_variable(var_name.value.clone(), Scope::Global)
            .assign(var_value, var_name.origin)
            .map_err(|e| Error::with_name_and_assign_error(var_name.value.clone(), e))?;

        if let Some(value) = optarg {
            env.get_or_create_variable("OPTARG", Scope::Global)
                .assign(value, location.clone())
                .map_err(|e| Error::with_name_and_assign_error("OPTARG".to_string(), e))?;
        } else {
            env.variables.unset(Scope::Global, "OPTARG")?;
        }

        let optind = indexes_to_optind(self.next_arg_index, self.next_char_index);
        env.get_or_create_variable("OPTIND", Scope::Global)
            .assign(optind, location)
            .map_err(|e| Error::with_name_and_assign_error("OPTIND".to_string(), e))?;

        Ok(message)
    }
}
