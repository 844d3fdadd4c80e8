//! Hexstead - a settlement builder on an endless, chunk-streamed hex map

fn main() {
    hexstead::app().run();
}
