use crate::cli::ValidateArgs;
use crate::gl::glstring::{fully_qualify, read_gl_string_file, validate_format};
use crate::utils::Result;

pub fn validate(args: ValidateArgs) -> Result<()> {
    let gl_strings = read_gl_string_file(&args.gl_strings_path)?;

    let mut invalid = 0;
    for (id, gl_string) in &gl_strings {
        match fully_qualify(gl_string).and_then(|qualified| validate_format(&qualified)) {
            Ok(()) => log::debug!("{}: valid", id),
            Err(e) => {
                invalid += 1;
                log::warn!("{}: {}", id, e);
            }
        }
    }

    if invalid > 0 {
        return Err(format!(
            "{} of {} GL Strings failed validation",
            invalid,
            gl_strings.len()
        ));
    }

    log::info!("All {} GL Strings are valid", gl_strings.len());
    Ok(())
}
