//! Narration scripts
//!
//! Pure mapping from session transitions to ordered narration lines. No I/O
//! happens here; the session pushes the returned items onto the speech queue.

use std::time::Duration;

use crate::recipes::Recipe;
use crate::speech::NarrationItem;

/// Pause after short prompts
pub const PAUSE_SHORT: Duration = Duration::from_millis(500);

/// Pause after enumerated lines (suggestions, ingredients)
pub const PAUSE_MEDIUM: Duration = Duration::from_millis(800);

/// Pause after instruction steps
pub const PAUSE_LONG: Duration = Duration::from_secs(1);

/// Startup announcement once the speech device is ready
#[must_use]
pub fn system_ready() -> Vec<NarrationItem> {
    vec![NarrationItem::new("Food Vision Assistant is ready")]
}

/// Welcome script for a new session
#[must_use]
pub fn welcome() -> Vec<NarrationItem> {
    vec![
        NarrationItem::paced("Welcome to Food Vision Assistant!", PAUSE_SHORT),
        NarrationItem::paced(
            "Please place your food item in front of the camera",
            PAUSE_SHORT,
        ),
        NarrationItem::new("When ready, press C to capture the image or say 'capture'"),
    ]
}

/// Successful detection with its dish suggestions
#[must_use]
pub fn detection_result(class: &str, confidence: f32, suggestions: &[String]) -> Vec<NarrationItem> {
    let percent = f64::from(confidence) * 100.0;
    let mut lines = vec![NarrationItem::paced(
        format!("I detected a {class} with {percent:.1}% confidence"),
        PAUSE_MEDIUM,
    )];

    if !suggestions.is_empty() {
        lines.push(NarrationItem::paced(
            "Here are the suggested dishes you can make",
            PAUSE_SHORT,
        ));
        for (i, dish) in suggestions.iter().enumerate() {
            lines.push(NarrationItem::paced(
                format!("Number {}: {dish}", i + 1),
                PAUSE_MEDIUM,
            ));
        }
        lines.push(NarrationItem::new(
            "To hear any recipe, press its number on your keyboard",
        ));
    }

    lines
}

/// Nothing recognizable in the frame
#[must_use]
pub fn no_food_detected() -> Vec<NarrationItem> {
    vec![NarrationItem::new(
        "No food items were detected. Please try again with a clearer image",
    )]
}

/// Camera device missing
#[must_use]
pub fn camera_unavailable() -> Vec<NarrationItem> {
    vec![NarrationItem::new(
        "Camera is not available. Please check your camera connection",
    )]
}

/// Frame grab failed
#[must_use]
pub fn capture_failed() -> Vec<NarrationItem> {
    vec![NarrationItem::new("Failed to capture image. Please try again")]
}

/// Inference or other processing failure
#[must_use]
pub fn processing_error() -> Vec<NarrationItem> {
    vec![NarrationItem::new(
        "An error occurred during processing. Please try again",
    )]
}

/// Full recipe walkthrough: ingredients, steps, continue invitation
#[must_use]
pub fn recipe(name: &str, recipe: &Recipe) -> Vec<NarrationItem> {
    let mut lines = vec![
        NarrationItem::paced(format!("Here's how to make {name}"), PAUSE_SHORT),
        NarrationItem::paced("You will need these ingredients:", PAUSE_SHORT),
    ];

    for ingredient in &recipe.ingredients {
        lines.push(NarrationItem::paced(ingredient.clone(), PAUSE_MEDIUM));
    }

    lines.push(NarrationItem::paced("Now, follow these steps:", PAUSE_SHORT));
    for (i, step) in recipe.instructions.iter().enumerate() {
        lines.push(NarrationItem::paced(
            format!("Step {}: {step}", i + 1),
            PAUSE_LONG,
        ));
    }

    lines.push(NarrationItem::new(
        "At any time, you can say 'home' or 'back' to return to the main screen",
    ));
    lines.push(NarrationItem::new(
        "Would you like to try another dish? Press Y for yes, or N for no",
    ));

    lines
}

/// No recipe matched the chosen dish
#[must_use]
pub fn recipe_not_found(dish: &str) -> Vec<NarrationItem> {
    vec![NarrationItem::new(format!(
        "I couldn't find a recipe for {dish}"
    ))]
}

/// Selection number outside the suggestion range
#[must_use]
pub fn invalid_selection(max: usize) -> Vec<NarrationItem> {
    vec![NarrationItem::new(format!(
        "Please press a number between 1 and {max}"
    ))]
}

/// User chose to try another dish
#[must_use]
pub fn try_another() -> Vec<NarrationItem> {
    vec![
        NarrationItem::paced("Great! Let's try another dish", PAUSE_SHORT),
        NarrationItem::paced(
            "Please place your next food item in front of the camera",
            PAUSE_SHORT,
        ),
        NarrationItem::new("Press C when ready to capture, or say 'capture'"),
    ]
}

/// User chose to end the session
#[must_use]
pub fn farewell() -> Vec<NarrationItem> {
    vec![
        NarrationItem::paced("Thank you for using Food Vision Assistant", PAUSE_SHORT),
        NarrationItem::new("Have a great day!"),
    ]
}

/// Neither yes nor no
#[must_use]
pub fn reprompt_choice() -> Vec<NarrationItem> {
    vec![NarrationItem::new("Please press Y for yes or N for no")]
}

/// Returning to the home screen
#[must_use]
pub fn returning_home() -> Vec<NarrationItem> {
    vec![NarrationItem::new("Returning to home screen")]
}

/// Final line spoken during graceful shutdown
#[must_use]
pub fn shutting_down() -> NarrationItem {
    NarrationItem::paced("System shutting down", PAUSE_LONG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_script() {
        let lines = welcome();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, "Welcome to Food Vision Assistant!");
        assert_eq!(lines[0].pause_after, Some(PAUSE_SHORT));
    }

    #[test]
    fn test_detection_result_formats_confidence() {
        let suggestions = vec!["Tomato Soup".to_string(), "Bruschetta".to_string()];
        let lines = detection_result("tomato", 0.92, &suggestions);

        assert_eq!(lines[0].text, "I detected a tomato with 92.0% confidence");
        assert_eq!(lines[2].text, "Number 1: Tomato Soup");
        assert_eq!(lines[3].text, "Number 2: Bruschetta");
        assert_eq!(
            lines.last().unwrap().text,
            "To hear any recipe, press its number on your keyboard"
        );
    }

    #[test]
    fn test_detection_result_without_suggestions() {
        let lines = detection_result("tomato", 0.5, &[]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "I detected a tomato with 50.0% confidence");
    }

    #[test]
    fn test_recipe_script_numbers_steps() {
        let recipe_payload = Recipe {
            ingredients: vec!["2 tomatoes".to_string(), "1 onion".to_string()],
            instructions: vec!["Chop everything".to_string(), "Simmer".to_string()],
        };

        let lines = recipe("tomato soup", &recipe_payload);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();

        assert_eq!(texts[0], "Here's how to make tomato soup");
        assert!(texts.contains(&"2 tomatoes"));
        assert!(texts.contains(&"Step 1: Chop everything"));
        assert!(texts.contains(&"Step 2: Simmer"));
        assert_eq!(
            *texts.last().unwrap(),
            "Would you like to try another dish? Press Y for yes, or N for no"
        );
    }

    #[test]
    fn test_invalid_selection_names_range() {
        let lines = invalid_selection(4);
        assert_eq!(lines[0].text, "Please press a number between 1 and 4");
    }
}
