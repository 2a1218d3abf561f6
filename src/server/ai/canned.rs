//! Caption generator that doesn't need any external service.

use futures::future::{self, BoxFuture, FutureExt};
use memecraft::CaptionPair;
use memecraft::ai::random_canned;
use rand::thread_rng;

use super::{CaptionGenerator, GenerateError};


/// Generator handing out random captions from a built-in list.
///
/// Used when no API key has been configured, e.g. during development.
#[derive(Clone, Copy, Debug, Default)]
pub struct CannedGenerator;

impl CaptionGenerator for CannedGenerator {
    fn name(&self) -> &str {
        "canned"
    }

    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<CaptionPair, GenerateError>> {
        trace!("Ignoring prompt `{}` in favor of canned captions", prompt);
        let captions = random_canned(&mut thread_rng());
        future::ok(captions).boxed()
    }
}


#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use memecraft::ai::CANNED_CAPTIONS;
    use spectral::prelude::*;
    use super::{CaptionGenerator, CannedGenerator};

    #[test]
    fn generates_canned_captions() {
        let captions = block_on(CannedGenerator.generate("anything")).unwrap();
        assert_that!(CANNED_CAPTIONS.iter()
            .any(|&(t, b)| captions.top_text == t && captions.bottom_text == b)).is_true();
    }
}
