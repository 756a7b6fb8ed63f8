mod hardmax_props;
