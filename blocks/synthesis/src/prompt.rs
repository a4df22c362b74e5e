use taskforge_atoms::users::model::User;

/// Render the task-breakdown prompt. Deterministic for a given SRS text and
/// roster, so the same request always puts the same words in front of the
/// model.
pub fn build_prompt(srs_text: &str, developers: &[User]) -> String {
    let roster = if developers.is_empty() {
        "No developers available.".to_string()
    } else {
        developers
            .iter()
            .map(|dev| {
                format!(
                    "- UserID: {}, Name: {}, Skills: {}",
                    dev.user_id,
                    dev.user_name,
                    dev.skills.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are an expert Project Manager AI. Your job is to parse a Software Requirements Specification (SRS) document and break it down into actionable tasks for a development team.\n\
         \n\
         You must return your response as a single, valid JSON array of task objects. Do not include any text before or after the JSON array.\n\
         \n\
         Here is the list of available developers and their skills:\n\
         --- DEVELOPER LIST ---\n\
         {roster}\n\
         --- END DEVELOPER LIST ---\n\
         \n\
         Here is the Software Requirements Specification (SRS):\n\
         --- SRS ---\n\
         {srs_text}\n\
         --- END SRS ---\n\
         \n\
         Now, please generate the list of tasks. For each task, provide:\n\
         1. \"title\": A concise, clear task title.\n\
         2. \"description\": A detailed description of what needs to be done.\n\
         3. \"priority\": Assign a priority ('Low', 'Medium', 'High', 'Critical').\n\
         4. \"assigneeId\": Based on the developer list, intelligently assign this task to the developer whose skills best match the task. Use their UserID. If no developer is a good match, or if it's a general task, set this value to null.\n\
         5. \"notes\": Any extra context or reasoning for the assignment.\n\
         \n\
         Remember, the output MUST be a valid JSON array."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskforge_atoms::users::model::Role;

    fn dev(id: &str, name: &str, skills: &[&str]) -> User {
        User {
            user_id: id.to_string(),
            user_name: name.to_string(),
            user_email: format!("{}@example.com", id),
            user_role: Role::Developer,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            user_created_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn roster_lines_carry_id_name_and_skills() {
        let developers = vec![
            dev("sub-1", "Ada", &["rust", "sql"]),
            dev("sub-2", "Lin", &["react"]),
        ];
        let prompt = build_prompt("Build a login page.", &developers);
        assert!(prompt.contains("- UserID: sub-1, Name: Ada, Skills: rust, sql"));
        assert!(prompt.contains("- UserID: sub-2, Name: Lin, Skills: react"));
        assert!(prompt.contains("--- SRS ---\nBuild a login page.\n--- END SRS ---"));
    }

    #[test]
    fn empty_roster_is_called_out() {
        let prompt = build_prompt("Anything", &[]);
        assert!(prompt.contains("No developers available."));
    }

    #[test]
    fn prompt_is_deterministic() {
        let developers = vec![dev("sub-1", "Ada", &["rust"])];
        assert_eq!(
            build_prompt("Same SRS", &developers),
            build_prompt("Same SRS", &developers)
        );
    }
}
