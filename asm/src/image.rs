use crate::linker::Resolved;

/// Contiguous word stream from the lowest emitted address to the highest.
/// Gaps opened by `org_e` are zero-filled, and reserved spans emit their
/// full length as zero words, so the stream covers the whole addressed
/// range including a trailing reservation.
pub fn flat_words(records: &[Resolved]) -> Vec<u16> {
    let mut out: Vec<u16> = Vec::new();
    let mut cursor: Option<u32> = None;
    for record in records {
        let (addr, words) = record_words(record);
        let cur = *cursor.get_or_insert(u32::from(addr));
        for _ in cur..u32::from(addr) {
            out.push(0);
        }
        out.extend_from_slice(&words);
        cursor = Some(u32::from(addr) + words.len() as u32);
    }
    out
}

fn record_words(record: &Resolved) -> (u16, Vec<u16>) {
    match record {
        Resolved::Inst {
            addr, opcode, word, ..
        } => {
            let mut ws = vec![*opcode];
            if let Some(w) = word {
                ws.push(*w);
            }
            (*addr, ws)
        }
        Resolved::Words { addr, words, .. } => (*addr, words.clone()),
        Resolved::Reserve { addr, len, .. } => (*addr, vec![0; usize::from(*len)]),
    }
}

/// One `{:016b}` line per word.
pub fn flat_listing(records: &[Resolved]) -> String {
    let mut out = String::new();
    for word in flat_words(records) {
        out.push_str(&format!("{:016b}\n", word));
    }
    out
}

/// Group adjacent records into (start address, words) runs. Reserved spans
/// break runs without contributing words.
pub fn blocks(records: &[Resolved]) -> Vec<(u16, Vec<u16>)> {
    let mut out: Vec<(u16, Vec<u16>)> = Vec::new();
    for record in records {
        if matches!(record, Resolved::Reserve { .. }) {
            continue;
        }
        let (addr, words) = record_words(record);
        match out.last_mut() {
            Some((start, run)) if u32::from(*start) + run.len() as u32 == u32::from(addr) => {
                run.extend(words);
            }
            _ => out.push((addr, words)),
        }
    }
    out
}

/// Hex record lines, at most eight words each: `aaaa=wwww wwww ...`.
pub fn block_listing(records: &[Resolved]) -> String {
    let mut out = String::new();
    for (start, words) in blocks(records) {
        let mut addr = u32::from(start);
        for chunk in words.chunks(8) {
            let hex: Vec<String> = chunk.iter().map(|w| format!("{:04x}", w)).collect();
            out.push_str(&format!("{:04x}={}\n", addr, hex.join(" ")));
            addr += 8;
        }
    }
    out
}
