mod assignments;
mod utility;

pub fn commands() -> Vec<crate::Command> {
    assignments::commands()
        .into_iter()
        .chain(utility::commands())
        .collect()
}
