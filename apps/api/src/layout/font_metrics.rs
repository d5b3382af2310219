//! Static glyph-width tables for the two base-14 faces the PDF export uses.
//!
//! Widths come from the Adobe AFM files for Helvetica and Helvetica-Bold and
//! are stored in thousandths of an em, the unit the AFM files use.
//! The ASCII tables cover 0x20..=0x7E (95 printable characters);
//! index = (char as usize) - 32. A handful of WinAnsi punctuation marks that
//! show up in profile text are listed separately.

/// Base-14 Type 1 faces available without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Typeface {
    Helvetica,
    HelveticaBold,
}

impl Typeface {
    /// PostScript name written to the font dictionary.
    pub fn base_font(self) -> &'static str {
        match self {
            Typeface::Helvetica => "Helvetica",
            Typeface::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name the page content streams refer to.
    pub fn resource_name(self) -> &'static str {
        match self {
            Typeface::Helvetica => "F1",
            Typeface::HelveticaBold => "F2",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Page geometry in PDF points (1/72 inch).
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub page_width_pt: i32,
    pub page_height_pt: i32,
    /// Same margin on all four sides.
    pub margin_pt: i32,
    /// Baseline-to-baseline distance for body lines.
    pub leading_pt: i32,
}

impl PageConfig {
    pub fn text_width_pt(&self) -> f32 {
        (self.page_width_pt - 2 * self.margin_pt) as f32
    }

    /// Baseline of the first line on a fresh page.
    pub fn top_pt(&self) -> i32 {
        self.page_height_pt - self.margin_pt
    }
}

/// US letter (8.5" × 11") with 1" margins and 14pt leading.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        page_width_pt: 612,
        page_height_pt: 792,
        margin_pt: 72,
        leading_pt: 14,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one typeface.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [u16; 95],
    /// Width of the punctuation outside ASCII that the export emits or commonly receives.
    extras: &'static [(char, u16)],
    /// Used for every other character.
    pub fallback_width: u16,
}

impl FontMetricTable {
    fn char_width(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        self.extras
            .iter()
            .find(|(extra, _)| *extra == c)
            .map(|(_, width)| *width)
            .unwrap_or(self.fallback_width)
    }

    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| f32::from(self.char_width(c))).sum::<f32>() / 1000.0
    }

    /// Measures the rendered width of a string in points at `size_pt`.
    pub fn measure_pt(&self, s: &str, size_pt: f32) -> f32 {
        self.measure_str(s) * size_pt
    }

    /// Greedy word-wrap at `max_width_pt`.
    ///
    /// Runs of whitespace collapse to single spaces. A word wider than the
    /// whole line is split between characters. Blank input yields one empty
    /// line so callers still advance past it.
    pub fn wrap(&self, s: &str, size_pt: f32, max_width_pt: f32) -> Vec<String> {
        let space_w = self.measure_pt(" ", size_pt);
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in s.split_whitespace() {
            let word_w = self.measure_pt(word, size_pt);

            if !current.is_empty() && current_width + space_w + word_w <= max_width_pt {
                current.push(' ');
                current.push_str(word);
                current_width += space_w + word_w;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if word_w <= max_width_pt {
                current.push_str(word);
                current_width = word_w;
                continue;
            }

            // Hard-split an over-long word (typically a URL).
            current_width = 0.0;
            for c in word.chars() {
                let char_w = f32::from(self.char_width(c)) / 1000.0 * size_pt;
                if !current.is_empty() && current_width + char_w > max_width_pt {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(c);
                current_width += char_w;
            }
        }

        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_EXTRAS: [(char, u16); 9] = [
    ('•', 350),
    ('–', 556),
    ('—', 1000),
    ('·', 278),
    ('‘', 222),
    ('’', 222),
    ('“', 333),
    ('”', 333),
    ('…', 1000),
];

static HELVETICA_BOLD_EXTRAS: [(char, u16); 9] = [
    ('•', 350),
    ('–', 556),
    ('—', 1000),
    ('·', 278),
    ('‘', 278),
    ('’', 278),
    ('“', 500),
    ('”', 500),
    ('…', 1000),
];

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    extras: &HELVETICA_EXTRAS,
    fallback_width: 556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    extras: &HELVETICA_BOLD_EXTRAS,
    fallback_width: 611,
};

/// Returns the static metric table for a typeface.
pub fn get_metrics(typeface: Typeface) -> &'static FontMetricTable {
    match typeface {
        Typeface::Helvetica => &HELVETICA_TABLE,
        Typeface::HelveticaBold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
