//! Captions that don't need a language model.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::CaptionPair;


/// Captions handed out when no language model is configured.
pub const CANNED_CAPTIONS: &[(&str, &str)] = &[
    ("When your mom asks", "if you've studied for exams"),
    ("Nobody:", "Indian parents when you get 99%"),
    ("Me explaining to my boss", "why I need a day off"),
    ("My face when", "the waiter brings the wrong order"),
    ("Indian engineers", "fixing things with jugaad"),
    ("When your friend says", "they'll be there in 5 minutes"),
    ("That moment when", "you find money in old jeans"),
    ("Relatives at wedding:", "Beta, when are you getting married?"),
];


/// Pick one of the canned captions at random.
pub fn random_canned<R: Rng + ?Sized>(rng: &mut R) -> CaptionPair {
    let &(top, bottom) = CANNED_CAPTIONS.choose(rng).unwrap_or(&CANNED_CAPTIONS[0]);
    CaptionPair::new(top, bottom)
}

/// Captions shown to the user when generating them has failed.
pub fn failure_captions() -> CaptionPair {
    CaptionPair::new("मीम जेनरेशन एरर", "कृपया दुबारा कोशिश करें")
}


#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use super::{failure_captions, random_canned, CANNED_CAPTIONS};

    #[test]
    fn random_canned_is_one_of_them() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let captions = random_canned(&mut rng);
            assert!(CANNED_CAPTIONS.iter()
                .any(|&(t, b)| captions.top_text == t && captions.bottom_text == b));
        }
    }

    #[test]
    fn failure_captions_are_not_empty() {
        assert!(!failure_captions().is_empty());
    }
}
