use crate::constants::{AUDIO_CROSS_ORIGIN, AUDIO_SRC};
use deck_core::{AnalyserConfig, AnalyserTap, AudioTransport, DeckError};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

#[inline]
fn transport_err(e: JsValue) -> DeckError {
    DeckError::Transport(format!("{:?}", e))
}

#[inline]
fn analyser_err(e: JsValue) -> DeckError {
    DeckError::Analyser(format!("{:?}", e))
}

/// The deck's `<audio>` element, loading the track anonymously so the
/// analyser may read it.
pub fn create_element() -> anyhow::Result<web::HtmlAudioElement> {
    let element =
        web::HtmlAudioElement::new_with_src(AUDIO_SRC).map_err(|e| anyhow::anyhow!("{:?}", e))?;
    element.set_cross_origin(Some(AUDIO_CROSS_ORIGIN));
    Ok(element)
}

/// The deck's single `<audio>` source.
pub struct WebTransport {
    element: web::HtmlAudioElement,
    // Receives the DOMException name of a rejected play() promise
    on_rejected: Rc<dyn Fn(String)>,
}

impl WebTransport {
    pub fn new(element: web::HtmlAudioElement, on_rejected: impl Fn(String) + 'static) -> Self {
        Self {
            element,
            on_rejected: Rc::new(on_rejected),
        }
    }
}

impl AudioTransport for WebTransport {
    type Tap = WebAnalyser;

    fn play(&mut self) -> deck_core::Result<()> {
        let promise: js_sys::Promise = self.element.play().map_err(transport_err)?;
        let on_rejected = self.on_rejected.clone();
        // Autoplay rejection arrives asynchronously
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                let name = e
                    .dyn_ref::<js_sys::Error>()
                    .map(|err| String::from(err.name()))
                    .unwrap_or_default();
                log::error!("[audio] play rejected name={} {:?}", name, e);
                on_rejected(name);
            }
        });
        Ok(())
    }

    fn pause(&mut self) -> deck_core::Result<()> {
        self.element.pause().map_err(transport_err)
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
    }

    fn create_tap(&mut self, config: &AnalyserConfig) -> deck_core::Result<WebAnalyser> {
        WebAnalyser::new(&self.element, config)
    }
}

impl Drop for WebTransport {
    fn drop(&mut self) {
        _ = self.element.pause();
        self.element.set_src("");
    }
}

/// AudioContext + AnalyserNode fed from the audio element.
pub struct WebAnalyser {
    ctx: web::AudioContext,
    analyser: web::AnalyserNode,
    element: web::HtmlAudioElement,
    source: Option<web::MediaElementAudioSourceNode>,
}

impl WebAnalyser {
    fn new(element: &web::HtmlAudioElement, config: &AnalyserConfig) -> deck_core::Result<Self> {
        let ctx = web::AudioContext::new().map_err(analyser_err)?;
        let analyser = web::AnalyserNode::new(&ctx).map_err(analyser_err)?;
        analyser.set_fft_size(config.fft_size);
        analyser.set_smoothing_time_constant(config.smoothing);
        Ok(Self {
            ctx,
            analyser,
            element: element.clone(),
            source: None,
        })
    }
}

impl AnalyserTap for WebAnalyser {
    fn connect(&mut self) -> deck_core::Result<()> {
        // A media element can only ever be wrapped by one source node
        if self.source.is_some() {
            return Ok(());
        }
        let source = self
            .ctx
            .create_media_element_source(&self.element)
            .map_err(analyser_err)?;
        source
            .connect_with_audio_node(&self.analyser)
            .map_err(analyser_err)?;
        self.analyser
            .connect_with_audio_node(&self.ctx.destination())
            .map_err(analyser_err)?;
        self.source = Some(source);
        log::info!("[audio] analyser connected");
        Ok(())
    }

    fn is_suspended(&self) -> bool {
        self.ctx.state() == web::AudioContextState::Suspended
    }

    fn resume(&mut self) -> deck_core::Result<()> {
        self.ctx.resume().map(|_| ()).map_err(analyser_err)
    }

    fn frequency_bin_count(&self) -> usize {
        self.analyser.frequency_bin_count() as usize
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        self.analyser.get_byte_frequency_data(out);
    }
}

impl Drop for WebAnalyser {
    fn drop(&mut self) {
        if let Some(source) = self.source.take() {
            _ = source.disconnect();
        }
        _ = self.ctx.close();
    }
}
