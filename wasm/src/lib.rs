use morsechat_core::{code_to_text as decode_code, text_to_code as encode_text, CwConfig, Decoder, Encoder};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmEncoder {
    inner: Encoder,
}

#[wasm_bindgen]
impl WasmEncoder {
    #[wasm_bindgen(constructor)]
    pub fn new(wpm: u32, tone_frequency_hz: f32, sample_rate: u32) -> Result<WasmEncoder, JsValue> {
        let config = CwConfig {
            wpm,
            tone_frequency_hz,
            sample_rate_hz: sample_rate,
        };
        Encoder::new(config)
            .map(|encoder| WasmEncoder { inner: encoder })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Synthesize text into audio samples
    /// Returns a Float32Array at the encoder's sample rate
    #[wasm_bindgen]
    pub fn synthesize(&self, text: &str) -> Vec<f32> {
        self.inner.synthesize(text)
    }

    #[wasm_bindgen(getter)]
    pub fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }
}

#[wasm_bindgen]
pub struct WasmDecoder {
    inner: Decoder,
}

#[wasm_bindgen]
impl WasmDecoder {
    #[wasm_bindgen(constructor)]
    pub fn new(wpm: u32) -> Result<WasmDecoder, JsValue> {
        Decoder::new(CwConfig::with_wpm(wpm))
            .map(|decoder| WasmDecoder { inner: decoder })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Feed a tone of the given length in milliseconds
    #[wasm_bindgen]
    pub fn on_tone(&mut self, duration_ms: f64) {
        self.inner.on_tone(duration_ms);
    }

    /// Feed a silence of the given length in milliseconds
    #[wasm_bindgen]
    pub fn on_silence(&mut self, duration_ms: f64) {
        self.inner.on_silence(duration_ms);
    }

    #[wasm_bindgen]
    pub fn flush(&mut self) {
        self.inner.flush();
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    #[wasm_bindgen]
    pub fn set_wpm(&mut self, wpm: u32) -> Result<(), JsValue> {
        self.inner
            .set_wpm(wpm)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Decoded text including the partial word and pending dots/dashes
    #[wasm_bindgen]
    pub fn decoded_text(&self) -> String {
        self.inner.decoded_text()
    }
}

#[wasm_bindgen]
pub fn text_to_code(text: &str) -> String {
    encode_text(text)
}

#[wasm_bindgen]
pub fn code_to_text(code: &str) -> String {
    decode_code(code)
}
