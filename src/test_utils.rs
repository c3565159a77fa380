use crate::models::domain::Question;

/// Roughly 600 characters of introductory mechanics.
pub fn science_passage() -> String {
    "Newton's first law states that an object keeps moving at a constant velocity unless a net force acts on it. \
Friction between surfaces is a force that opposes motion and converts kinetic energy into heat. \
When a ball is thrown upward, gravity slows it down until it momentarily stops at the highest point. \
In a vacuum, a feather and a hammer released together reach the ground at the same moment. \
Acceleration measures how quickly velocity changes and is expressed in metres per second squared. \
Momentum is the product of mass and velocity, and it is conserved in collisions between isolated objects."
        .to_string()
}

/// A block in the output contract, without its `QUESTION <n>:` marker.
pub fn well_formed_block(n: usize) -> String {
    format!(
        "In trial {n}, which quantity stays constant for a cart moving at steady speed in a straight line?\n\
A) Its position\n\
B) Its velocity\n\
C) The direction of its acceleration\n\
D) The distance it has travelled\n\
CORRECT: B\n\
EXPLANATION: Steady speed in a straight line means the velocity does not change."
    )
}

/// `count` numbered blocks, as a provider following the contract returns them.
pub fn well_formed_completion(count: usize) -> String {
    (1..=count)
        .map(|n| format!("QUESTION {}:\n{}", n, well_formed_block(n)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn sample_multiple_choice(question_text: &str) -> Question {
    Question::multiple_choice(
        question_text,
        vec![
            "Alpha".to_string(),
            "Beta".to_string(),
            "Gamma".to_string(),
            "Delta".to_string(),
        ],
        2,
        "Gamma is the documented answer.",
    )
}
