#![no_main]
use libfuzzer_sys::fuzz_target;
use transcodec::{Transcoder, Value};

fuzz_target!(|data: &[u8]| {
    // Every reachable decoder must reject bad input with an error, never a
    // panic, whichever format the consumer stores.
    for format in ["buffer", "view", "utf8"] {
        let Ok(transcoder) = Transcoder::new([format]) else {
            continue;
        };
        for encoding in transcoder.encodings() {
            let stored = match encoding.format().as_str() {
                "buffer" => Value::from(data),
                "view" => Value::View(data.to_vec().into()),
                _ => Value::from(String::from_utf8_lossy(data).into_owned()),
            };
            if let Ok(decoded) = encoding.decode(stored) {
                let _ = encoding.encode(decoded);
            }
        }
    }
});
